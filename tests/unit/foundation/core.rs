use super::*;

#[test]
fn time_span_contains_boundaries() {
    let s = TimeSpan::new(TimeMs(2), TimeMs(5)).unwrap();
    assert!(!s.contains(TimeMs(1)));
    assert!(s.contains(TimeMs(2)));
    assert!(s.contains(TimeMs(4)));
    assert!(!s.contains(TimeMs(5)));
    assert_eq!(s.len(), TimeMs(3));
}

#[test]
fn time_span_rejects_reversed_bounds() {
    assert!(TimeSpan::new(TimeMs(5), TimeMs(2)).is_err());
    assert!(TimeSpan::new(TimeMs(5), TimeMs(5)).unwrap().is_empty());
}

#[test]
fn from_secs_rounds_to_millis() {
    assert_eq!(TimeMs::from_secs_f64(1.2344).unwrap(), TimeMs(1234));
    assert_eq!(TimeMs::from_secs_f64(1.2345).unwrap(), TimeMs(1235));
    assert_eq!(TimeMs::from_secs_f64(0.0).unwrap(), TimeMs::ZERO);
}

#[test]
fn whole_seconds_do_not_overflow() {
    assert_eq!(TimeMs::from_secs(u64::MAX), TimeMs(u64::MAX));
    assert_eq!(TimeMs::checked_from_secs(u64::MAX), None);
    assert_eq!(TimeMs::checked_from_secs(7), Some(TimeMs(7000)));
}

#[test]
fn from_secs_rejects_negative_and_nan() {
    assert!(TimeMs::from_secs_f64(-0.5).is_err());
    assert!(TimeMs::from_secs_f64(f64::NAN).is_err());
    assert!(TimeMs::from_secs_f64(f64::INFINITY).is_err());
}

#[test]
fn parse_timecode_accepts_supported_shapes() {
    assert_eq!(TimeMs::parse_timecode("90").unwrap(), TimeMs::from_secs(90));
    assert_eq!(TimeMs::parse_timecode("12.5").unwrap(), TimeMs(12_500));
    assert_eq!(TimeMs::parse_timecode("01:30").unwrap(), TimeMs::from_secs(90));
    assert_eq!(
        TimeMs::parse_timecode("00:01:30.250").unwrap(),
        TimeMs(90_250)
    );
    assert_eq!(
        TimeMs::parse_timecode("1:00:00").unwrap(),
        TimeMs::from_secs(3600)
    );
    assert_eq!(" 00:00:15 ".parse::<TimeMs>().unwrap(), TimeMs::from_secs(15));
}

#[test]
fn parse_timecode_rejects_malformed_input() {
    for bad in ["", "abc", "1:2:3:4", "00:61", "00:75:00", "-5", "1e3", ":", "00:.", "1..2"] {
        assert!(TimeMs::parse_timecode(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn display_uses_ffmpeg_friendly_format() {
    assert_eq!(TimeMs(0).to_string(), "0:00:00.000");
    assert_eq!(TimeMs(3_661_500).to_string(), "1:01:01.500");
}
