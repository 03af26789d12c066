use super::*;
use crate::foundation::error::DrivecamError;

fn at(ms: u64, speed: f64) -> TelemetrySample {
    TelemetrySample::new(TimeMs(ms)).with_speed(speed)
}

fn bounds(t: &Timeline<'_>) -> Vec<(u64, u64)> {
    t.intervals.iter().map(|i| (i.start.0, i.end.0)).collect()
}

fn speeds(t: &Timeline<'_>) -> Vec<Option<f64>> {
    t.intervals
        .iter()
        .map(|i| i.sample.and_then(|s| s.speed))
        .collect()
}

#[test]
fn consecutive_samples_become_consecutive_intervals() {
    let samples = vec![at(0, 1.0), at(1000, 2.0), at(2500, 3.0)];
    let t = synchronize(&samples, TimeMs(4000), &TrimSpec::disabled()).unwrap();
    assert_eq!(bounds(&t), vec![(0, 1000), (1000, 2500), (2500, 4000)]);
    assert_eq!(speeds(&t), vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert!(t.is_contiguous());
}

#[test]
fn single_sample_spans_whole_timeline() {
    let samples = vec![at(1200, 9.0)];
    let t = synchronize(&samples, TimeMs(5000), &TrimSpec::disabled()).unwrap();
    assert_eq!(bounds(&t), vec![(0, 5000)]);
    assert_eq!(speeds(&t), vec![Some(9.0)]);
}

#[test]
fn out_of_order_input_is_sorted() {
    let samples = vec![at(2000, 3.0), at(0, 1.0), at(1000, 2.0)];
    let t = synchronize(&samples, TimeMs(3000), &TrimSpec::disabled()).unwrap();
    assert_eq!(bounds(&t), vec![(0, 1000), (1000, 2000), (2000, 3000)]);
    assert_eq!(speeds(&t), vec![Some(1.0), Some(2.0), Some(3.0)]);
}

#[test]
fn duplicate_timestamps_keep_the_earlier_sample() {
    let samples = vec![at(0, 1.0), at(1000, 2.0), at(1000, 99.0), at(2000, 3.0)];
    let t = synchronize(&samples, TimeMs(3000), &TrimSpec::disabled()).unwrap();
    assert_eq!(t.intervals.len(), 3);
    assert_eq!(speeds(&t), vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert!(t.intervals.iter().all(|i| i.end > i.start));
}

#[test]
fn late_first_sample_is_extended_back_to_zero() {
    let samples = vec![at(700, 4.0), at(1500, 5.0)];
    let t = synchronize(&samples, TimeMs(2000), &TrimSpec::disabled()).unwrap();
    assert_eq!(bounds(&t), vec![(0, 1500), (1500, 2000)]);
    assert!(t.is_contiguous());
}

#[test]
fn samples_past_the_video_end_are_dropped() {
    let samples = vec![at(0, 1.0), at(3000, 2.0), at(9000, 3.0)];
    let t = synchronize(&samples, TimeMs(3000), &TrimSpec::disabled()).unwrap();
    assert_eq!(bounds(&t), vec![(0, 3000)]);
    assert_eq!(speeds(&t), vec![Some(1.0)]);
}

#[test]
fn trim_reanchors_last_sample_before_window() {
    let samples = vec![at(0, 0.0), at(3000, 3.0), at(8000, 8.0), at(15_000, 15.0)];
    let trim = TrimSpec::window(TimeMs::from_secs(5), TimeMs::from_secs(10));
    let t = synchronize(&samples, TimeMs::from_secs(20), &trim).unwrap();
    assert_eq!(bounds(&t), vec![(0, 3000), (3000, 10_000)]);
    assert_eq!(speeds(&t), vec![Some(3.0), Some(8.0)]);
    assert_eq!(t.duration(), TimeMs::from_secs(10));
}

#[test]
fn sample_at_window_start_wins_over_reanchored_one() {
    let samples = vec![at(1000, 1.0), at(5000, 5.0), at(7000, 7.0)];
    let trim = TrimSpec::window(TimeMs::from_secs(5), TimeMs::from_secs(5));
    let t = synchronize(&samples, TimeMs::from_secs(20), &trim).unwrap();
    assert_eq!(bounds(&t), vec![(0, 2000), (2000, 5000)]);
    assert_eq!(speeds(&t), vec![Some(5.0), Some(7.0)]);
}

#[test]
fn reanchored_tie_prefers_earlier_listed_sample() {
    let samples = vec![at(2000, 1.0), at(2000, 2.0), at(6000, 6.0)];
    let trim = TrimSpec::window(TimeMs::from_secs(4), TimeMs::from_secs(4));
    let t = synchronize(&samples, TimeMs::from_secs(10), &trim).unwrap();
    assert_eq!(speeds(&t), vec![Some(1.0), Some(6.0)]);
}

#[test]
fn trim_past_metadata_holds_last_sample() {
    let samples = vec![at(0, 1.0), at(2000, 2.0)];
    let trim = TrimSpec::window(TimeMs::from_secs(10), TimeMs::from_secs(5));
    let t = synchronize(&samples, TimeMs::from_secs(30), &trim).unwrap();
    assert_eq!(bounds(&t), vec![(0, 5000)]);
    assert_eq!(speeds(&t), vec![Some(2.0)]);
}

#[test]
fn no_samples_yields_placeholder() {
    let t = synchronize(&[], TimeMs(4000), &TrimSpec::disabled()).unwrap();
    assert_eq!(bounds(&t), vec![(0, 4000)]);
    assert!(t.intervals[0].sample.is_none());
    assert_eq!(t.populated(), 0);
    assert!(t.is_contiguous());
}

#[test]
fn samples_only_after_window_yield_placeholder() {
    let samples = vec![at(9000, 1.0)];
    let trim = TrimSpec::window(TimeMs::from_secs(1), TimeMs::from_secs(2));
    let t = synchronize(&samples, TimeMs::from_secs(10), &trim).unwrap();
    assert_eq!(bounds(&t), vec![(0, 2000)]);
    assert!(t.intervals[0].sample.is_none());
}

#[test]
fn zero_duration_fails() {
    let samples = vec![at(0, 1.0)];
    assert!(matches!(
        synchronize(&samples, TimeMs::ZERO, &TrimSpec::disabled()),
        Err(DrivecamError::InvalidDuration(_))
    ));
}

#[test]
fn empty_trim_window_fails() {
    let samples = vec![at(0, 1.0)];
    let trim = TrimSpec::window(TimeMs::from_secs(10), TimeMs::from_secs(1));
    assert!(matches!(
        synchronize(&samples, TimeMs::from_secs(10), &trim),
        Err(DrivecamError::EmptyTimeline(_))
    ));
}

#[test]
fn input_slice_is_left_untouched() {
    let samples = vec![at(2000, 2.0), at(0, 1.0)];
    let copy = samples.clone();
    let _ = synchronize(&samples, TimeMs(3000), &TrimSpec::disabled()).unwrap();
    assert_eq!(samples, copy);
}
