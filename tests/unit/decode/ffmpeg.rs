use super::*;

#[test]
fn parse_probe_json_reads_first_video_stream() {
    let json = br#"{
        "streams": [
            {"codec_type": "audio"},
            {
                "codec_type": "video",
                "width": 1280,
                "height": 720,
                "r_frame_rate": "30000/1001",
                "nb_frames": "250"
            }
        ]
    }"#;
    let (info, counted) = parse_probe_json(json).unwrap();
    assert!(counted);
    assert_eq!((info.width, info.height), (1280, 720));
    assert_eq!(info.fps, Fps::new(30000, 1001).unwrap());
    assert_eq!(info.frame_count, 250);
}

#[test]
fn parse_probe_json_falls_back_to_read_frames() {
    let json = br#"{"streams": [{
        "codec_type": "video", "width": 64, "height": 48,
        "r_frame_rate": "25/1", "nb_read_frames": "12"
    }]}"#;
    let (info, counted) = parse_probe_json(json).unwrap();
    assert!(counted);
    assert_eq!(info.frame_count, 12);
}

#[test]
fn parse_probe_json_flags_missing_count() {
    let json = br#"{"streams": [{
        "codec_type": "video", "width": 64, "height": 48, "r_frame_rate": "25/1"
    }]}"#;
    let (info, counted) = parse_probe_json(json).unwrap();
    assert!(!counted);
    assert_eq!(info.frame_count, 0);
}

#[test]
fn parse_probe_json_requires_video_stream() {
    let json = br#"{"streams": [{"codec_type": "audio"}]}"#;
    let err = parse_probe_json(json).unwrap_err();
    assert!(matches!(err, KeeperError::Media(_)));

    let err = parse_probe_json(b"not json").unwrap_err();
    assert!(matches!(err, KeeperError::Serde(_)));
}

#[test]
fn rotated_stream_keeps_stored_dimensions() {
    // Portrait phone footage: stored landscape, displayed rotated by 90 degrees.
    let json = br#"{"streams": [{
        "codec_type": "video", "width": 1920, "height": 1080,
        "r_frame_rate": "30/1", "nb_frames": "90",
        "tags": {"rotate": "-90"},
        "side_data_list": [
            {"side_data_type": "Display Matrix", "displaymatrix": "...", "rotation": -90}
        ]
    }]}"#;
    let (info, _) = parse_probe_json(json).unwrap();
    assert_eq!((info.width, info.height), (1920, 1080));
    assert_eq!(byte_len(info.width, info.height).unwrap(), 1920 * 1080 * 3);
}

#[test]
fn decode_args_disable_autorotate_before_input() {
    let args: Vec<String> = FfmpegSource::decode_args(Path::new("in/phone clip.mov"))
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let rotate = args.iter().position(|a| a == "-noautorotate").unwrap();
    let input = args.iter().position(|a| a == "-i").unwrap();
    assert!(rotate < input);
    assert_eq!(args[input + 1], "in/phone clip.mov");
    assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
}

#[test]
fn read_full_reports_short_reads_at_eof() {
    let data = [1u8, 2, 3, 4, 5];
    let mut reader = &data[..];
    let mut buf = [0u8; 3];
    assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 3);
    assert_eq!(buf, [1, 2, 3]);
    assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 2);
    assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 0);
}

#[test]
fn open_missing_file_is_media_error() {
    let err = match FfmpegSource::open("/definitely/not/here.mp4") {
        Ok(_) => panic!("expected error"),
        Err(e) => e,
    };
    assert!(matches!(err, KeeperError::Media(_)));
}
