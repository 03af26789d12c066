use super::*;

#[test]
fn object_root_with_vin_and_entries() {
    let json = r#"{
        "VIN": "WBA12345678901234",
        "entries": [
            { "velocity": 52.5, "date": "2024-05-01", "time": "14:23:05",
              "latitude": 48.137154, "longitude": 11.575382 },
            { "velocity": 53.0 }
        ]
    }"#;
    let meta = Metadata::from_json_str(json).unwrap();
    assert_eq!(meta.vin, "WBA12345678901234");
    assert_eq!(meta.records.len(), 2);
    assert_eq!(meta.skipped, 0);

    let first = &meta.records[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.speed, Some(52.5));
    assert_eq!(first.date.as_deref(), Some("2024-05-01"));
    assert_eq!(first.time.as_deref(), Some("14:23:05"));
    assert_eq!(first.latitude, Some(48.137154));
    assert_eq!(first.offset, None);

    let second = &meta.records[1];
    assert_eq!(second.latitude, None);
    assert_eq!(second.date, None);
}

#[test]
fn array_root_uses_first_element() {
    let json = r#"[{ "entries": [ { "velocity": 10 } ] }, { "entries": [] }]"#;
    let meta = Metadata::from_json_str(json).unwrap();
    assert_eq!(meta.vin, UNKNOWN_VIN);
    assert_eq!(meta.records.len(), 1);
    assert_eq!(meta.records[0].speed, Some(10.0));
}

#[test]
fn missing_entries_yields_no_records() {
    let meta = Metadata::from_json_str(r#"{ "VIN": "X" }"#).unwrap();
    assert!(meta.records.is_empty());
}

#[test]
fn malformed_records_are_skipped_not_fabricated() {
    let json = r#"{ "entries": [
        { "velocity": "fast" },
        { "velocity": "42.5", "timestamp": "1.25" },
        { "latitude": 123.0, "longitude": 0.0 },
        7,
        { "timestamp": -1 },
        { "velocity": 50, "date": ["x"] },
        { "velocity": null, "time": "" }
    ] }"#;
    let meta = Metadata::from_json_str(json).unwrap();
    assert_eq!(meta.skipped, 5);
    assert_eq!(meta.records.len(), 2);

    assert_eq!(meta.records[0].index, 1);
    assert_eq!(meta.records[0].speed, Some(42.5));
    assert_eq!(meta.records[0].offset, Some(TimeMs(1250)));

    assert_eq!(meta.records[1].index, 6);
    assert_eq!(meta.records[1].speed, None);
    assert_eq!(meta.records[1].time, None);
}

#[test]
fn structurally_invalid_documents_fail() {
    assert!(matches!(
        Metadata::from_json_str("not json"),
        Err(DrivecamError::Serde(_))
    ));
    assert!(Metadata::from_json_str("[]").is_err());
    assert!(Metadata::from_json_str("42").is_err());
    assert!(Metadata::from_json_str(r#"{ "entries": {} }"#).is_err());
}
