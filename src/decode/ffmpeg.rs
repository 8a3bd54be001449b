use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{ChildStdout, Command, Stdio};

use crate::decode::source::{FrameSource, SourceInfo};
use crate::foundation::core::Fps;
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::process::ToolProcess;
use crate::render::frame::{VideoFrame, byte_len};

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    nb_read_frames: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
}

/// Probe width, height, frame rate and frame count of the first video stream of `path`.
///
/// Containers that do not record a frame count are probed a second time with
/// `-count_frames`, which decodes the whole stream.
pub fn probe_video(path: &Path) -> KeeperResult<SourceInfo> {
    let out = run_ffprobe(path, &["-show_streams"])?;
    let (mut info, counted) = parse_probe_json(&out)?;
    if !counted {
        tracing::debug!(path = %path.display(), "no nb_frames in container; counting frames");
        let out = run_ffprobe(
            path,
            &[
                "-count_frames",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=codec_type,width,height,r_frame_rate,nb_read_frames",
            ],
        )?;
        let (recount, counted) = parse_probe_json(&out)?;
        if !counted {
            return Err(KeeperError::media(format!(
                "could not determine frame count of '{}'",
                path.display()
            )));
        }
        info.frame_count = recount.frame_count;
    }
    Ok(info)
}

fn run_ffprobe(path: &Path, extra: &[&str]) -> KeeperResult<Vec<u8>> {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json"])
        .args(extra)
        .arg(path)
        .output()
        .map_err(|e| KeeperError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(KeeperError::media(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

/// Parse `ffprobe -print_format json` output.
///
/// The flag is `true` when a frame count was present; otherwise `frame_count` is 0.
pub(crate) fn parse_probe_json(bytes: &[u8]) -> KeeperResult<(SourceInfo, bool)> {
    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| KeeperError::serde(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| KeeperError::media("no video stream found"))?;
    let width = video
        .width
        .ok_or_else(|| KeeperError::media("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| KeeperError::media("missing video height from ffprobe"))?;
    let fps = video
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| KeeperError::media("missing r_frame_rate from ffprobe"))
        .and_then(Fps::parse_ratio)?;

    let count = video
        .nb_frames
        .as_deref()
        .or(video.nb_read_frames.as_deref())
        .and_then(|s| s.trim().parse::<u64>().ok());

    Ok((
        SourceInfo {
            width,
            height,
            fps,
            frame_count: count.unwrap_or(0),
        },
        count.is_some(),
    ))
}

/// Source that spawns the system `ffmpeg` and reads raw RGB24 frames from its stdout.
///
/// Frames come out in stored orientation, so their size always equals the probed
/// width and height even when the container carries a display rotation.
pub struct FfmpegSource {
    path: PathBuf,
    info: SourceInfo,
    frame_len: usize,

    stdout: Option<ChildStdout>,
    decoder: Option<ToolProcess>,
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    pub fn open(path: impl Into<PathBuf>) -> KeeperResult<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(KeeperError::media(format!(
                "input video '{}' not found",
                path.display()
            )));
        }
        let info = probe_video(&path)?;
        let frame_len = byte_len(info.width, info.height)?;
        if frame_len == 0 {
            return Err(KeeperError::media(
                "decoded video frame size is zero (invalid source dimensions)",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args(Self::decode_args(&path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped());
        let mut decoder = ToolProcess::spawn(cmd)?;
        let stdout = decoder.take_stdout()?;

        tracing::debug!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps.as_f64(),
            frames = info.frame_count,
            "ffmpeg decoder started"
        );
        Ok(Self {
            path,
            info,
            frame_len,
            stdout: Some(stdout),
            decoder: Some(decoder),
        })
    }

    /// `ffmpeg` arguments decoding `path` to raw RGB24 on stdout.
    ///
    /// `-noautorotate` must precede `-i`; it keeps rotated phone footage at its stored size.
    pub(crate) fn decode_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-v", "error", "-noautorotate", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(path.as_os_str().to_owned());
        args.extend(
            ["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"]
                .into_iter()
                .map(OsString::from),
        );
        args
    }

    fn finish(&mut self) -> KeeperResult<()> {
        drop(self.stdout.take());
        match self.decoder.take() {
            Some(mut decoder) => decoder.wait(&format!("decode '{}'", self.path.display())),
            None => Ok(()),
        }
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_frame(&mut self) -> KeeperResult<Option<VideoFrame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.frame_len];
        let filled = read_full(stdout, &mut buf)
            .map_err(|e| KeeperError::media(format!("failed to read frame from ffmpeg: {e}")))?;
        if filled == 0 {
            self.finish()?;
            return Ok(None);
        }
        if filled < self.frame_len {
            self.finish()?;
            return Err(KeeperError::media(format!(
                "truncated frame from ffmpeg: got {filled} bytes, expected {}",
                self.frame_len
            )));
        }
        VideoFrame::from_raw(self.info.width, self.info.height, buf).map(Some)
    }
}

/// Read until `buf` is full or the reader hits EOF; returns the number of bytes read.
pub(crate) fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "../../tests/unit/decode/ffmpeg.rs"]
mod tests;
