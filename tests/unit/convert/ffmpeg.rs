use super::*;

fn args_of(job: &TranscodeJob) -> Vec<String> {
    job.to_args()
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn job() -> TranscodeJob {
    TranscodeJob {
        input: PathBuf::from("in.ts"),
        output: PathBuf::from("out.mov"),
        crop_filter: Some("crop=960:540:0:0".to_string()),
        overlay: Some(PathBuf::from("/tmp/drive.ass")),
        trim: None,
        encoder: EncoderSettings::default(),
    }
}

#[test]
fn default_encoder_is_archival_quality() {
    let args = args_of(&job());
    assert_eq!(
        args,
        vec![
            "-hide_banner",
            "-nostdin",
            "-i",
            "in.ts",
            "-vf",
            "crop=960:540:0:0,ass='/tmp/drive.ass'",
            "-c:v",
            "libx264",
            "-preset",
            "veryslow",
            "-crf",
            "1",
            "-c:a",
            "aac",
            "-b:a",
            "128k",
            "-movflags",
            "+faststart",
            "-y",
            "out.mov",
        ]
    );
}

#[test]
fn trim_seeks_before_input_and_limits_after() {
    let mut j = job();
    j.trim = Some(TrimWindow {
        start: TimeMs(15_000),
        duration: TimeMs(10_250),
    });
    let args = args_of(&j);
    let i = args.iter().position(|a| a == "-i").unwrap();
    assert_eq!(&args[i - 2..i], ["-ss", "15.000"]);
    assert_eq!(&args[i + 2..i + 4], ["-t", "10.250"]);
}

#[test]
fn fast_preset_omits_quality_flags() {
    let mut j = job();
    j.encoder = EncoderSettings::fast();
    let args = args_of(&j);
    assert!(!args.iter().any(|a| a == "-preset" || a == "-crf" || a == "-b:a"));
    assert!(args.iter().any(|a| a == "+faststart"));
}

#[test]
fn filter_chain_skips_absent_parts() {
    let mut j = job();
    j.crop_filter = None;
    assert_eq!(j.filter_chain().as_deref(), Some("ass='/tmp/drive.ass'"));
    j.overlay = None;
    assert_eq!(j.filter_chain(), None);
    assert!(!args_of(&j).iter().any(|a| a == "-vf"));
}

#[test]
fn ass_filter_escapes_special_characters() {
    assert_eq!(
        ass_filter(Path::new("C:\\tmp\\it's.ass")),
        "ass='C\\:\\\\tmp\\\\it\\'s.ass'"
    );
}

#[test]
fn progress_lines_are_parsed() {
    let line = "frame=  123 fps= 30 q=28.0 size=    1024kB time=00:01:23.45 bitrate=1234.5kbits/s speed=1.5x";
    assert_eq!(parse_progress(line), Some(TimeMs(83_450)));
    assert_eq!(parse_progress("size=0kB time=N/A bitrate=N/A"), None);
    assert_eq!(parse_progress("Stream #0:0: Video: h264"), None);
    assert_eq!(parse_progress("time=-00:00:00.04"), Some(TimeMs::ZERO));
}

#[test]
fn progress_with_out_of_range_clock_is_ignored() {
    assert_eq!(parse_progress("time=18446744073709551615:00:00.00"), None);
    assert_eq!(parse_progress("time=00:18446744073709551615:00.00"), None);
    assert_eq!(parse_progress("time=5124095576031:00:00.00"), None);
    assert_eq!(
        parse_progress("time=5124095576030:00:00.00"),
        Some(TimeMs(18_446_744_073_708_000_000))
    );
}

#[test]
fn progress_fraction_is_clamped() {
    let p = TranscodeProgress::new(TimeMs(5000), TimeMs(10_000));
    assert_eq!(p.fraction, Some(0.5));
    let p = TranscodeProgress::new(TimeMs(12_000), TimeMs(10_000));
    assert_eq!(p.fraction, Some(1.0));
    assert_eq!(TranscodeProgress::new(TimeMs(1), TimeMs::ZERO).fraction, None);
}

#[test]
fn encoder_validation() {
    EncoderSettings::default().validate().unwrap();
    EncoderSettings::fast().validate().unwrap();
    let bad = EncoderSettings {
        crf: Some(60),
        ..EncoderSettings::default()
    };
    assert!(bad.validate().is_err());
    let bad = EncoderSettings {
        video_codec: " ".to_string(),
        ..EncoderSettings::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn encoder_settings_deserialize_partially() {
    let s: EncoderSettings = serde_json::from_str(r#"{ "crf": 18, "preset": "medium" }"#).unwrap();
    assert_eq!(s.crf, Some(18));
    assert_eq!(s.preset.as_deref(), Some("medium"));
    assert_eq!(s.audio_bitrate.as_deref(), Some("128k"));
    assert!(serde_json::from_str::<EncoderSettings>(r#"{ "bogus": 1 }"#).is_err());
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("out.mov")).unwrap();
}
