use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::audio::pcm::probe_duration_secs;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::narration::binder::{AudioHandle, Narration, Synthesize, VoiceId};

/// Synthesizes speech with the `edge-tts` command line tool and measures it with `ffprobe`.
#[derive(Clone, Debug)]
pub struct EdgeTtsCommand {
    pub program: PathBuf,
    /// Speaking rate offset, e.g. `+0%` or `-10%`.
    pub rate: String,
    /// Volume offset, e.g. `+0%`.
    pub volume: String,
}

impl Default for EdgeTtsCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from("edge-tts"),
            rate: "+0%".to_string(),
            volume: "+0%".to_string(),
        }
    }
}

impl EdgeTtsCommand {
    pub fn args(&self, text: &str, voice: VoiceId, out_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--voice".into(),
            voice.as_str().into(),
            format!("--rate={}", self.rate).into(),
            format!("--volume={}", self.volume).into(),
            "--text".into(),
            text.into(),
            "--write-media".into(),
        ];
        args.push(out_path.as_os_str().to_owned());
        args
    }
}

impl Synthesize for EdgeTtsCommand {
    fn synthesize(&self, text: &str, voice: VoiceId, out_path: &Path) -> NewsreelResult<Narration> {
        ensure_parent_dir(out_path)?;
        let out = Command::new(&self.program)
            .args(self.args(text, voice, out_path))
            .output()
            .map_err(|e| {
                NewsreelError::narration(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;
        if !out.status.success() {
            return Err(NewsreelError::narration(format!(
                "'{}' exited with status {}: {}",
                self.program.display(),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let duration_secs = probe_duration_secs(out_path)?;
        info!(
            path = %out_path.display(),
            duration_secs,
            voice = %voice,
            "generated narration audio"
        );
        Ok(Narration {
            audio: AudioHandle::new(out_path),
            duration_secs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/edge_tts.rs"]
mod tests;
