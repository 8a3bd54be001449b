use super::*;
use crate::foundation::core::{Fps, Rgb8};

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30000, 1001).unwrap(),
    }
}

fn args_of(opts: &FfmpegSinkOpts, cfg: SinkConfig) -> Vec<String> {
    FfmpegSink::encode_args(opts, cfg)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

#[test]
fn opts_default_to_overwrite() {
    let opts = FfmpegSinkOpts::new("out/video.mp4");
    assert!(opts.overwrite);
    assert_eq!(opts.out_path, PathBuf::from("out/video.mp4"));
}

#[test]
fn odd_sizes_fall_back_to_full_chroma() {
    assert_eq!(output_pix_fmt(1920, 1080), "yuv420p");
    assert_eq!(output_pix_fmt(1919, 1080), "yuv444p");
    assert_eq!(output_pix_fmt(640, 361), "yuv444p");
}

#[test]
fn encode_args_describe_raw_input_and_output() {
    let opts = FfmpegSinkOpts::new("clips/out.mp4");
    let args = args_of(&opts, cfg(64, 48));
    assert_eq!(args[0], "-y");
    assert_eq!(value_after(&args, "-s"), vec!["64x48"]);
    assert_eq!(value_after(&args, "-r"), vec!["30000/1001"]);
    assert_eq!(value_after(&args, "-pix_fmt"), vec!["rgb24", "yuv420p"]);
    assert_eq!(value_after(&args, "-i"), vec!["pipe:0"]);
    assert_eq!(args.last().map(String::as_str), Some("clips/out.mp4"));

    let odd = args_of(
        &FfmpegSinkOpts {
            overwrite: false,
            ..opts
        },
        cfg(63, 47),
    );
    assert_eq!(odd[0], "-n");
    assert_eq!(value_after(&odd, "-s"), vec!["63x47"]);
    assert_eq!(value_after(&odd, "-pix_fmt"), vec!["rgb24", "yuv444p"]);
}

#[test]
fn begin_accepts_odd_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join(format!("keeperviz_odd_dims_{}.mp4", std::process::id())),
    ));
    // Without ffmpeg on PATH this fails as a media error, never as a size rejection.
    if let Err(err) = sink.begin(cfg(63, 47)) {
        assert!(matches!(err, KeeperError::Media(_)), "{err}");
    }
    // dropped without `end`: the encoder is killed and reaped
}

#[test]
fn begin_rejects_zero_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("keeperviz_zero_dims.mp4"),
    ));
    let err = sink.begin(cfg(0, 48)).unwrap_err();
    assert!(matches!(err, KeeperError::Validation(_)));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = VideoFrame::filled(2, 2, Rgb8::new(0, 0, 0));
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let root = std::env::temp_dir().join(format!("keeperviz_parent_{}", std::process::id()));
    let target = root.join("a").join("b").join("out.mp4");
    ensure_parent_dir(&target).unwrap();
    assert!(root.join("a").join("b").is_dir());
    let _ = std::fs::remove_dir_all(&root);
}
