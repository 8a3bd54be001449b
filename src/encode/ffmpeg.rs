use std::ffi::OsString;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::process::{ToolProcess, tool_on_path};
use crate::render::frame::VideoFrame;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Chroma layout for H.264 output at `width x height`.
///
/// 4:2:0 halves chroma resolution and needs even dimensions; odd-sized frames keep their size by
/// falling back to full-resolution 4:4:4.
pub fn output_pix_fmt(width: u32, height: u32) -> &'static str {
    if width.is_multiple_of(2) && height.is_multiple_of(2) {
        "yuv420p"
    } else {
        "yuv444p"
    }
}

/// Sink that pipes raw RGB24 frames into the system `ffmpeg` and writes an H.264 MP4.
///
/// Dropping the sink before [`FrameSink::end`] kills the encoder; the partial output is left as is.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    stdin: Option<ChildStdin>,
    encoder: Option<ToolProcess>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            stdin: None,
            encoder: None,
            cfg: None,
            last_idx: None,
        }
    }

    /// Full `ffmpeg` argument list for encoding frames of `cfg` into `opts.out_path`.
    pub(crate) fn encode_args(opts: &FfmpegSinkOpts, cfg: SinkConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |a: &str| args.push(a.into());
        push(if opts.overwrite { "-y" } else { "-n" });
        for a in ["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24"] {
            push(a);
        }
        push("-s");
        push(format!("{}x{}", cfg.width, cfg.height).as_str());
        // `-r` ahead of `-i` is the rawvideo input rate.
        push("-r");
        push(format!("{}/{}", cfg.fps.num, cfg.fps.den).as_str());
        for a in ["-i", "pipe:0", "-an", "-c:v", "libx264", "-pix_fmt"] {
            push(a);
        }
        push(output_pix_fmt(cfg.width, cfg.height));
        push("-movflags");
        push("+faststart");
        args.push(opts.out_path.clone().into_os_string());
        args
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> KeeperResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(KeeperError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(KeeperError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(KeeperError::media(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let pix_fmt = output_pix_fmt(cfg.width, cfg.height);
        if pix_fmt != "yuv420p" {
            tracing::warn!(
                width = cfg.width,
                height = cfg.height,
                pix_fmt,
                "odd frame size; encoding without chroma subsampling"
            );
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(Self::encode_args(&self.opts, cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null());
        let mut encoder = ToolProcess::spawn(cmd)?;
        self.stdin = Some(encoder.take_stdin()?);
        self.encoder = Some(encoder);

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps.as_f64(),
            pix_fmt,
            "ffmpeg encoder started"
        );
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &VideoFrame) -> KeeperResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| KeeperError::media("ffmpeg sink not started"))?;
        if self.last_idx.is_some_and(|last| idx.0 <= last.0) {
            return Err(KeeperError::media(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if (frame.width, frame.height) != (cfg.width, cfg.height) {
            return Err(KeeperError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| KeeperError::media("ffmpeg sink is already finalized"))?;
        stdin.write_all(&frame.data).map_err(|e| {
            KeeperError::media(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn end(&mut self) -> KeeperResult<()> {
        // EOF on stdin lets ffmpeg flush and exit.
        drop(self.stdin.take());
        let mut encoder = self
            .encoder
            .take()
            .ok_or_else(|| KeeperError::media("ffmpeg sink not started"))?;
        self.cfg = None;
        encoder.wait(&format!("encode '{}'", self.opts.out_path.display()))
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> KeeperResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    tool_on_path("ffprobe")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
