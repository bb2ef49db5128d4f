use std::path::Path;

use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Sample rate every narration clip is decoded to and the track is assembled at.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
pub const MIX_CHANNELS: u16 = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    pub fn silence(secs: f64, sample_rate: u32, channels: u16) -> Self {
        let frames = secs_to_sample_frames(secs, sample_rate);
        Self {
            sample_rate,
            channels,
            interleaved_f32: vec![0.0; frames * usize::from(channels)],
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.interleaved_f32.len() / usize::from(self.channels)
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / f64::from(self.sample_rate)
        }
    }
}

pub(crate) fn secs_to_sample_frames(secs: f64, sample_rate: u32) -> usize {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * f64::from(sample_rate)).round() as usize
}

/// Turns a narration file into PCM at [`MIX_SAMPLE_RATE`] stereo.
pub trait DecodeAudio: Send + Sync {
    fn decode(&self, path: &Path) -> NewsreelResult<AudioPcm>;
}

/// [`DecodeAudio`] backed by the system `ffmpeg` binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegDecoder;

impl DecodeAudio for FfmpegDecoder {
    fn decode(&self, path: &Path) -> NewsreelResult<AudioPcm> {
        decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)
    }
}

/// Decode any ffmpeg-readable audio file to interleaved stereo `f32` at `sample_rate`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> NewsreelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            NewsreelError::narration(format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(NewsreelError::narration(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: parse_f32le(&out.stdout)?,
    })
}

pub(crate) fn parse_f32le(bytes: &[u8]) -> NewsreelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(NewsreelError::narration(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Container duration in seconds as reported by `ffprobe`.
pub fn probe_duration_secs(path: &Path) -> NewsreelResult<f64> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| NewsreelError::narration(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(NewsreelError::narration(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_duration(&String::from_utf8_lossy(&out.stdout))
}

pub(crate) fn parse_probe_duration(stdout: &str) -> NewsreelResult<f64> {
    let value = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| NewsreelError::narration("ffprobe reported no duration"))?;
    let secs: f64 = value
        .parse()
        .map_err(|_| NewsreelError::narration(format!("ffprobe duration '{value}' is not a number")))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(NewsreelError::narration(format!(
            "ffprobe duration must be > 0, got {secs}"
        )));
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
