use tracing::debug;

use crate::audio::track::AudioTrack;
use crate::foundation::core::Fps;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::render::frame::RenderedFrame;
use crate::timeline::plan::SceneTimeline;

/// Everything the encoder needs: one still per scene, how long each is shown, and the soundtrack.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodingRequest {
    pub frames: Vec<RenderedFrame>,
    pub durations: Vec<f64>,
    pub audio: AudioTrack,
    pub fps: Fps,
}

impl EncodingRequest {
    /// Check sync and shape the timeline for the encoder.
    ///
    /// The video and audio lengths may differ by at most one frame interval.
    pub fn build(timeline: &SceneTimeline, audio: AudioTrack, fps: Fps) -> NewsreelResult<Self> {
        let first = timeline
            .scenes()
            .first()
            .ok_or_else(|| NewsreelError::validation("cannot encode an empty timeline"))?;
        let (width, height) = (first.frame.width, first.frame.height);
        for scene in timeline.scenes() {
            scene.frame.validate()?;
            if scene.frame.width != width || scene.frame.height != height {
                return Err(NewsreelError::validation(format!(
                    "scene {} is {}x{}, expected {width}x{height}",
                    scene.scene_index, scene.frame.width, scene.frame.height
                )));
            }
        }

        let video_secs = timeline.total_secs();
        let audio_secs = audio.duration_secs();
        let tolerance = fps.frame_duration_secs();
        let drift = (video_secs - audio_secs).abs();
        if drift.is_nan() || drift > tolerance {
            return Err(NewsreelError::sync(format!(
                "video is {video_secs:.3}s but audio is {audio_secs:.3}s (drift {drift:.3}s > {tolerance:.3}s)"
            )));
        }
        debug!(video_secs, audio_secs, drift, "audio/video in sync");

        Ok(Self {
            frames: timeline.scenes().iter().map(|s| s.frame.clone()).collect(),
            durations: timeline.durations(),
            audio,
            fps,
        })
    }

    pub fn width(&self) -> u32 {
        self.frames.first().map(|f| f.width).unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.frames.first().map(|f| f.height).unwrap_or(0)
    }

    pub fn total_secs(&self) -> f64 {
        self.durations.iter().sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/request.rs"]
mod tests;
