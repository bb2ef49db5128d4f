use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use anyhow::Context as _;
use tracing::{debug, info, instrument};

use crate::audio::pcm::{MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::encode::request::EncodingRequest;
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Video encoder collaborator.
pub trait Encode {
    /// Encode `request` into a finished video at `out_path`.
    fn encode(&self, request: &EncodingRequest, out_path: &Path) -> NewsreelResult<()>;
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> NewsreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encodes with the system `ffmpeg` binary: PNG stills driven by a concat list with per-scene
/// durations, plus the soundtrack as raw `f32le`.
///
/// The video is written to a temporary file next to `out_path` and renamed into place only after
/// ffmpeg succeeds.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    pub program: PathBuf,
    pub preset: String,
    pub crf: u8,
    pub audio_bitrate: String,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            preset: "medium".to_string(),
            crf: 23,
            audio_bitrate: "192k".to_string(),
        }
    }
}

impl FfmpegEncoder {
    /// Full ffmpeg argument list for one encode.
    pub fn args(
        &self,
        request: &EncodingRequest,
        concat_list: &Path,
        audio_path: &Path,
        out_path: &Path,
    ) -> Vec<OsString> {
        let fps = format!("{}/{}", request.fps.num, request.fps.den);
        let sample_rate = MIX_SAMPLE_RATE.to_string();
        let channels = MIX_CHANNELS.to_string();
        let crf = self.crf.to_string();

        let mut args = os_args(&["-y", "-loglevel", "error", "-f", "concat", "-safe", "0", "-i"]);
        args.push(concat_list.as_os_str().to_owned());
        args.extend(os_args(&["-f", "f32le", "-ar", &sample_rate, "-ac", &channels, "-i"]));
        args.push(audio_path.as_os_str().to_owned());
        args.extend(os_args(&[
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-r",
            &fps,
            "-c:v",
            "libx264",
            "-preset",
            &self.preset,
            "-crf",
            &crf,
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-b:a",
            &self.audio_bitrate,
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ]));
        args.push(out_path.as_os_str().to_owned());
        args
    }
}

fn os_args(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

/// ffconcat script showing `files[i]` for `durations[i]` seconds.
///
/// The last file is listed twice: the concat demuxer ignores the duration of the final entry.
pub fn concat_list(files: &[String], durations: &[f64]) -> String {
    let mut out = String::from("ffconcat version 1.0\n");
    for (file, duration) in files.iter().zip(durations) {
        out.push_str(&format!("file '{}'\n", escape_concat_path(file)));
        out.push_str(&format!("duration {duration:.6}\n"));
    }
    if let Some(last) = files.last() {
        out.push_str(&format!("file '{}'\n", escape_concat_path(last)));
    }
    out
}

fn escape_concat_path(path: &str) -> String {
    path.replace('\'', "'\\''")
}

fn frame_file_name(index: usize) -> String {
    format!("scene_{index:03}.png")
}

impl Encode for FfmpegEncoder {
    #[instrument(skip_all, fields(out = %out_path.display(), scenes = request.frames.len()))]
    fn encode(&self, request: &EncodingRequest, out_path: &Path) -> NewsreelResult<()> {
        if request.frames.is_empty() || request.frames.len() != request.durations.len() {
            return Err(NewsreelError::validation(
                "encoding request needs one duration per frame and at least one frame",
            ));
        }
        let (width, height) = (request.width(), request.height());
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(NewsreelError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        ensure_parent_dir(out_path)?;

        let scratch = tempfile::Builder::new()
            .prefix("newsreel-encode-")
            .tempdir()
            .context("create encoder scratch directory")?;

        let mut files = Vec::with_capacity(request.frames.len());
        for (idx, frame) in request.frames.iter().enumerate() {
            let name = frame_file_name(idx);
            frame.save_png(&scratch.path().join(&name))?;
            files.push(name);
        }
        let list_path = scratch.path().join("scenes.ffconcat");
        std::fs::write(&list_path, concat_list(&files, &request.durations))
            .with_context(|| format!("write concat list '{}'", list_path.display()))?;
        let audio_path = scratch.path().join("narration.f32le");
        request.audio.write_f32le(&audio_path)?;

        let out_dir = out_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp_out = tempfile::Builder::new()
            .prefix(".newsreel-")
            .suffix(".mp4.part")
            .tempfile_in(out_dir)
            .with_context(|| format!("create temporary output in '{}'", out_dir.display()))?;

        let args = self.args(request, &list_path, &audio_path, tmp_out.path());
        debug!(args = ?args, "running ffmpeg");
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                NewsreelError::encode(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NewsreelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tmp_out
            .persist(out_path)
            .map_err(|e| NewsreelError::encode(format!("failed to move video into place: {e}")))?;
        info!(
            path = %out_path.display(),
            duration_secs = request.total_secs(),
            "video encoded"
        );
        Ok(())
    }
}

/// Records requests instead of encoding them.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    captured: Mutex<Vec<(PathBuf, EncodingRequest)>>,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests seen so far with their output paths, oldest first.
    pub fn captured(&self) -> Vec<(PathBuf, EncodingRequest)> {
        self.captured
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Encode for InMemoryEncoder {
    fn encode(&self, request: &EncodingRequest, out_path: &Path) -> NewsreelResult<()> {
        let mut captured = self
            .captured
            .lock()
            .map_err(|_| NewsreelError::encode("in-memory encoder lock poisoned"))?;
        captured.push((out_path.to_path_buf(), request.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
