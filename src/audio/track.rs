use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::audio::pcm::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, secs_to_sample_frames};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::script::SegmentKind;
use crate::timeline::plan::ScenePlan;

/// The finished narration soundtrack, interleaved `f32`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioTrack {
    /// Lay narration clips along the plan: silence for the intro, each item's clip followed by
    /// the plan's item padding, silence for the ending.
    ///
    /// `clips` holds one decoded clip per item scene, in item order, at [`MIX_SAMPLE_RATE`]
    /// stereo. The track length reflects the decoded audio, not the durations the plan was built
    /// from.
    pub fn concat_narration(plan: &ScenePlan, clips: &[AudioPcm]) -> NewsreelResult<Self> {
        if clips.len() != plan.item_count() {
            return Err(NewsreelError::timeline(format!(
                "got {} narration clips for {} item scenes",
                clips.len(),
                plan.item_count()
            )));
        }

        let channels = usize::from(MIX_CHANNELS);
        let mut samples = Vec::with_capacity(
            secs_to_sample_frames(plan.total_secs(), MIX_SAMPLE_RATE) * channels,
        );
        let push_silence = |samples: &mut Vec<f32>, secs: f64| {
            let n = secs_to_sample_frames(secs, MIX_SAMPLE_RATE) * channels;
            samples.resize(samples.len() + n, 0.0);
        };

        let mut clips_iter = clips.iter();
        for scene in plan.scenes() {
            match scene.kind {
                SegmentKind::Intro | SegmentKind::Ending => {
                    push_silence(&mut samples, scene.duration_secs)
                }
                SegmentKind::Item(item) => {
                    let clip = clips_iter.next().ok_or_else(|| {
                        NewsreelError::timeline(format!("no narration clip for item {item}"))
                    })?;
                    if clip.sample_rate != MIX_SAMPLE_RATE || clip.channels != MIX_CHANNELS {
                        return Err(NewsreelError::validation(format!(
                            "narration clip for item {item} is {} Hz / {} ch, expected {MIX_SAMPLE_RATE} Hz / {MIX_CHANNELS} ch",
                            clip.sample_rate, clip.channels
                        )));
                    }
                    samples.extend_from_slice(&clip.interleaved_f32[..clip.frames() * channels]);
                    push_silence(&mut samples, plan.config().item_padding_secs);
                }
            }
        }

        Ok(Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            interleaved_f32: samples,
        })
    }

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

    /// Write raw little-endian `f32` samples (ffmpeg `-f f32le`).
    pub fn write_f32le(&self, out_path: &Path) -> NewsreelResult<()> {
        let file = std::fs::File::create(out_path)
            .with_context(|| format!("create audio file '{}'", out_path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        for &sample in &self.interleaved_f32 {
            writer
                .write_all(&sample.to_le_bytes())
                .with_context(|| format!("write audio file '{}'", out_path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("flush audio file '{}'", out_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
