use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use keeperviz::config::{prediction_sidecar_path, read_prediction};
use keeperviz::encode::ffmpeg::ensure_parent_dir;
use keeperviz::{
    ClipLibrary, FfmpegSink, FfmpegSinkOpts, FfmpegSource, FolderClipLoader, FrameSource,
    GuideOverlay, OverlayConfig, RenderStats, VideoFrame, VideoRenderer,
};

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "avi", "mkv"];

#[derive(Parser, Debug)]
#[command(name = "keeperviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Overlay a goalkeeper dive onto one video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Detect the goal in a single PNG frame and print its box as JSON.
    Detect(DetectArgs),
    /// Render every video in a folder concurrently.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Overlay config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the color-distance threshold.
    #[arg(long)]
    threshold: Option<u8>,

    /// Override the fraction of the clip played across the video.
    #[arg(long)]
    speed: Option<f64>,

    /// Override the downward sprite shift (fraction of sprite height).
    #[arg(long)]
    y_offset: Option<f64>,

    /// Draw goal outline and region separators.
    #[arg(long, default_value_t = false)]
    guides: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Folder holding `dive_left`, `dive_center` and `dive_right`.
    #[arg(long)]
    clips: PathBuf,

    /// Dive direction (`left`, `center` or `right`).
    #[arg(long, conflicts_with = "prediction")]
    direction: Option<String>,

    /// File holding the dive direction. Defaults to `<stem>_prediction.txt` next to the input.
    #[arg(long)]
    prediction: Option<PathBuf>,

    #[command(flatten)]
    overlay: OverlayArgs,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Input PNG frame.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write a copy of the frame with region guides drawn.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Overlay config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Folder of input videos.
    #[arg(long)]
    in_dir: PathBuf,

    /// Folder receiving `<stem>_visualization.mp4` outputs.
    #[arg(long)]
    out_dir: PathBuf,

    /// Folder holding `dive_left`, `dive_center` and `dive_right`.
    #[arg(long)]
    clips: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    overlay: OverlayArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Detect(args) => cmd_detect(args),
        Command::Batch(args) => cmd_batch(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<OverlayConfig> {
    match path {
        Some(p) => Ok(OverlayConfig::from_path(p)?),
        None => Ok(OverlayConfig::default()),
    }
}

impl OverlayArgs {
    fn resolve(&self) -> anyhow::Result<OverlayConfig> {
        let mut cfg = load_config(self.config.as_deref())?;
        if let Some(t) = self.threshold {
            cfg.detection.threshold = t;
        }
        if let Some(s) = self.speed {
            cfg.animation.speed = s;
        }
        if let Some(y) = self.y_offset {
            cfg.animation.y_offset_fraction = y;
        }
        if self.guides {
            cfg.guides.enabled = true;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn build_renderer(cfg: &OverlayConfig) -> anyhow::Result<VideoRenderer> {
    let mut renderer = VideoRenderer::new(cfg.detection.clone())?;
    if cfg.guides.enabled {
        renderer = renderer.with_guides(GuideOverlay::new(cfg.guides.labels.clone()));
    }
    Ok(renderer)
}

fn direction_label(video: &Path, prediction: Option<&Path>) -> anyhow::Result<String> {
    let path = prediction.map_or_else(|| prediction_sidecar_path(video), Path::to_path_buf);
    match read_prediction(&path)? {
        Some(label) => Ok(label),
        None => {
            if prediction.is_some() {
                anyhow::bail!("prediction file '{}' not found", path.display());
            }
            tracing::info!(
                video = %video.display(),
                "no prediction sidecar; using 'center'"
            );
            Ok("center".to_owned())
        }
    }
}

fn render_video(
    video: &Path,
    out: &Path,
    label: &str,
    library: &ClipLibrary,
    renderer: &VideoRenderer,
    cfg: &OverlayConfig,
) -> anyhow::Result<RenderStats> {
    let mut source = FfmpegSource::open(video)?;
    let info = source.info();
    let state = library.set_animation(label, info.frame_count, cfg.animation)?;

    ensure_parent_dir(out)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out));
    let stats = renderer
        .render(&mut source, Some(state), &mut sink)
        .with_context(|| format!("render '{}'", video.display()))?;
    Ok(stats)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.overlay.resolve()?;
    let label = match &args.direction {
        Some(d) => d.clone(),
        None => direction_label(&args.in_path, args.prediction.as_deref())?,
    };

    let library = ClipLibrary::load(&FolderClipLoader::new(&args.clips));
    let renderer = build_renderer(&cfg)?;
    let stats = render_video(&args.in_path, &args.out, &label, &library, &renderer, &cfg)?;

    eprintln!(
        "wrote {} ({} frames, goal found in {}, sprite drawn in {})",
        args.out.display(),
        stats.frames_total,
        stats.frames_detected,
        stats.frames_composited
    );
    Ok(())
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let img = image::open(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?
        .to_rgb8();
    let mut frame = VideoFrame::from_rgb_image(img);
    let renderer = VideoRenderer::new(cfg.detection.clone())?;
    let report = renderer.process_frame(&mut frame, None)?;

    let out = serde_json::json!({
        "width": frame.width,
        "height": frame.height,
        "goal": report.goal,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    if let Some(out_path) = &args.out {
        GuideOverlay::new(cfg.guides.labels.clone()).draw(&mut frame, report.goal)?;
        ensure_parent_dir(out_path)?;
        let (w, h) = (frame.width, frame.height);
        image::save_buffer_with_format(
            out_path,
            &frame.data,
            w,
            h,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out_path.display()))?;
        eprintln!("wrote {}", out_path.display());
    }
    Ok(())
}

fn list_videos(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut videos = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read input dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_video = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| VIDEO_EXTENSIONS.iter().any(|v| e.eq_ignore_ascii_case(v)));
        if path.is_file() && is_video {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let cfg = args.overlay.resolve()?;
    let videos = list_videos(&args.in_dir)?;
    if videos.is_empty() {
        anyhow::bail!("no videos found in '{}'", args.in_dir.display());
    }

    let library = ClipLibrary::load(&FolderClipLoader::new(&args.clips));
    let renderer = build_renderer(&cfg)?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = args.threads {
        pool = pool.num_threads(threads);
    }
    let pool = pool.build().context("build rayon thread pool")?;

    let results: Vec<(PathBuf, anyhow::Result<RenderStats>)> = pool.install(|| {
        videos
            .par_iter()
            .map(|video| {
                let stem = video
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let out = args.out_dir.join(format!("{stem}_visualization.mp4"));
                let res = direction_label(video, None).and_then(|label| {
                    render_video(video, &out, &label, &library, &renderer, &cfg)
                });
                (out, res)
            })
            .collect()
    });

    let mut failed = 0usize;
    for (out, res) in &results {
        match res {
            Ok(stats) => eprintln!("wrote {} ({} frames)", out.display(), stats.frames_total),
            Err(err) => {
                failed += 1;
                let msg = format!("{err:#}");
                tracing::error!(out = %out.display(), error = %msg, "render failed");
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} videos failed", results.len());
    }
    Ok(())
}
