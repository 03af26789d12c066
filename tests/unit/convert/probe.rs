use super::*;

const TS_PROBE: &str = r#"{
    "streams": [
        { "index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080 },
        { "index": 1, "codec_type": "audio", "codec_name": "aac" }
    ],
    "format": { "filename": "drive.ts", "duration": "62.480000" }
}"#;

#[test]
fn parses_dimensions_duration_and_audio() {
    let info = parse_probe_output(Path::new("drive.ts"), TS_PROBE.as_bytes()).unwrap();
    assert_eq!(info.width, 1920);
    assert_eq!(info.height, 1080);
    assert_eq!(info.duration, TimeMs(62_480));
    assert!(info.has_audio);
    assert_eq!(info.source_path, PathBuf::from("drive.ts"));
}

#[test]
fn falls_back_to_stream_duration() {
    let json = r#"{
        "streams": [ { "codec_type": "video", "width": 640, "height": 480, "duration": "5.5" } ],
        "format": {}
    }"#;
    let info = parse_probe_output(Path::new("a.ts"), json.as_bytes()).unwrap();
    assert_eq!(info.duration, TimeMs(5500));
    assert!(!info.has_audio);
}

#[test]
fn missing_video_stream_is_a_tool_error() {
    let json = r#"{ "streams": [ { "codec_type": "audio" } ], "format": { "duration": "1.0" } }"#;
    assert!(matches!(
        parse_probe_output(Path::new("a.ts"), json.as_bytes()),
        Err(DrivecamError::Tool(_))
    ));
}

#[test]
fn missing_duration_is_invalid_duration() {
    let json = r#"{ "streams": [ { "codec_type": "video", "width": 2, "height": 2 } ] }"#;
    assert!(matches!(
        parse_probe_output(Path::new("a.ts"), json.as_bytes()),
        Err(DrivecamError::InvalidDuration(_))
    ));
}

#[test]
fn garbage_output_is_rejected() {
    assert!(parse_probe_output(Path::new("a.ts"), b"not json").is_err());
}
