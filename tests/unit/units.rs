use super::*;

#[test]
fn speed_conversion_uses_fixed_factor() {
    let mph = to_mph(100.0).unwrap();
    assert!((mph - 62.137_119).abs() < 1e-5);
    assert_eq!(to_kmh(100.0).unwrap(), 100.0);

    // Repeated calls are bit-identical.
    for _ in 0..10 {
        assert_eq!(to_mph(100.0).unwrap().to_bits(), mph.to_bits());
        assert_eq!(to_kmh(100.0).unwrap(), 100.0);
    }
}

#[test]
fn speed_rejects_non_finite_values() {
    assert!(matches!(
        to_mph(f64::NAN),
        Err(DrivecamError::InvalidSample(_))
    ));
    assert!(to_kmh(f64::INFINITY).is_err());
}

#[test]
fn speed_text_lists_both_units() {
    assert_eq!(format_speed(100.0).unwrap(), "62.1 mph (100.0 km/h)");
    assert_eq!(format_speed(0.0).unwrap(), "0.0 mph (0.0 km/h)");
}

#[test]
fn coordinate_hemisphere_letters() {
    assert_eq!(
        format_coordinate(48.137154, Axis::Latitude).unwrap(),
        "48.137154° N"
    );
    assert_eq!(
        format_coordinate(-33.8688, Axis::Latitude).unwrap(),
        "33.868800° S"
    );
    assert_eq!(
        format_coordinate(11.575382, Axis::Longitude).unwrap(),
        "11.575382° E"
    );
    assert_eq!(
        format_coordinate(-122.4194, Axis::Longitude).unwrap(),
        "122.419400° W"
    );
    assert_eq!(format_coordinate(0.0, Axis::Latitude).unwrap(), "0.000000° N");
    assert_eq!(format_coordinate(0.0, Axis::Longitude).unwrap(), "0.000000° E");
}

#[test]
fn coordinate_out_of_range_is_invalid_sample() {
    assert!(matches!(
        format_coordinate(91.0, Axis::Latitude),
        Err(DrivecamError::InvalidSample(_))
    ));
    assert!(format_coordinate(120.0, Axis::Longitude).is_ok());
    assert!(format_coordinate(-180.5, Axis::Longitude).is_err());
    assert!(format_coordinate(f64::NAN, Axis::Longitude).is_err());
}
