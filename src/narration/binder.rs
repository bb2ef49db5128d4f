use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::foundation::pool::build_thread_pool;
use crate::script::ScriptSegment;

/// Voices the synthesizer is known to accept.
pub const VOICES: [&str; 7] = [
    "zh-CN-XiaoxiaoNeural",
    "zh-CN-XiaoyiNeural",
    "zh-CN-YunxiNeural",
    "zh-CN-YunyangNeural",
    "en-US-JennyNeural",
    "en-US-GuyNeural",
    "en-GB-SoniaNeural",
];

/// A recognized narration voice. Only values from [`VOICES`] parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoiceId(&'static str);

impl VoiceId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn all() -> impl Iterator<Item = VoiceId> {
        VOICES.into_iter().map(VoiceId)
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        VoiceId(VOICES[0])
    }
}

impl FromStr for VoiceId {
    type Err = NewsreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| {
                NewsreelError::narration(format!(
                    "unrecognized voice '{s}' (expected one of: {})",
                    VOICES.join(", ")
                ))
            })
    }
}

impl serde::Serialize for VoiceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for VoiceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Owned path to a synthesized audio file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AudioHandle(PathBuf);

impl AudioHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// What a [`Synthesize`] implementation hands back for one piece of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Narration {
    pub audio: AudioHandle,
    pub duration_secs: f64,
}

/// Text-to-speech collaborator.
pub trait Synthesize: Send + Sync {
    /// Speak `text` with `voice` into `out_path` and report the clip length.
    fn synthesize(&self, text: &str, voice: VoiceId, out_path: &Path) -> NewsreelResult<Narration>;
}

/// Narration bound to the segment it speaks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NarrationResult {
    pub segment: ScriptSegment,
    pub audio: AudioHandle,
    pub duration_secs: f64,
}

/// Runs a [`Synthesize`] collaborator over script segments.
pub struct NarrationBinder {
    synth: Arc<dyn Synthesize>,
    voice: VoiceId,
    out_dir: PathBuf,
    workers: usize,
}

impl NarrationBinder {
    pub fn new(synth: Arc<dyn Synthesize>, voice: VoiceId, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            synth,
            voice,
            out_dir: out_dir.into(),
            workers: 1,
        }
    }

    /// Synthesize on a bounded pool of `workers` threads. Output order is unaffected.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Clip path for the segment at `index`.
    pub fn clip_path(&self, index: usize) -> PathBuf {
        self.out_dir.join(format!("narration_{index:03}.mp3"))
    }

    /// One result per segment, in input order. The first failure aborts the batch.
    pub fn synthesize(&self, segments: &[ScriptSegment]) -> NewsreelResult<Vec<NarrationResult>> {
        if self.workers == 0 {
            return Err(NewsreelError::validation("narration workers must be >= 1"));
        }
        info!(
            segments = segments.len(),
            voice = %self.voice,
            workers = self.workers,
            "synthesizing narration"
        );

        let run_one =
            |(index, segment): (usize, &ScriptSegment)| self.synthesize_one(index, segment);

        if self.workers == 1 || segments.len() <= 1 {
            segments.iter().enumerate().map(run_one).collect()
        } else {
            let pool = build_thread_pool(self.workers)?;
            pool.install(|| segments.par_iter().enumerate().map(run_one).collect())
        }
    }

    fn synthesize_one(
        &self,
        index: usize,
        segment: &ScriptSegment,
    ) -> NewsreelResult<NarrationResult> {
        if segment.text.trim().is_empty() {
            return Err(NewsreelError::narration(format!(
                "segment {index} has no text to narrate"
            )));
        }

        let out_path = self.clip_path(index);
        let narration = self
            .synth
            .synthesize(&segment.text, self.voice, &out_path)
            .map_err(|e| match e {
                NewsreelError::Narration(_) => e,
                other => NewsreelError::narration(format!("segment {index}: {other}")),
            })?;

        if !narration.audio.path().is_file() {
            return Err(NewsreelError::narration(format!(
                "segment {index}: audio file '{}' is missing",
                narration.audio.path().display()
            )));
        }
        if !narration.duration_secs.is_finite() || narration.duration_secs <= 0.0 {
            return Err(NewsreelError::narration(format!(
                "segment {index}: duration must be finite and > 0, got {}",
                narration.duration_secs
            )));
        }

        debug!(
            scene = index,
            duration_secs = narration.duration_secs,
            "narration ready"
        );
        Ok(NarrationResult {
            segment: segment.clone(),
            audio: narration.audio,
            duration_secs: narration.duration_secs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/binder.rs"]
mod tests;
