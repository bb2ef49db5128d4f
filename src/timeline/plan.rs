use crate::foundation::core::{FrameIndex, FrameRange, Fps};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::narration::binder::NarrationResult;
use crate::render::frame::RenderedFrame;
use crate::script::{ScriptSegment, SegmentKind};

/// Fixed scene durations and the silence after each narrated item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub intro_secs: f64,
    pub ending_secs: f64,
    pub item_padding_secs: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            intro_secs: 5.0,
            ending_secs: 5.0,
            item_padding_secs: 0.5,
        }
    }
}

impl TimelineConfig {
    pub fn validate(&self) -> NewsreelResult<()> {
        if !self.intro_secs.is_finite() || self.intro_secs <= 0.0 {
            return Err(NewsreelError::validation("intro_secs must be finite and > 0"));
        }
        if !self.ending_secs.is_finite() || self.ending_secs <= 0.0 {
            return Err(NewsreelError::validation("ending_secs must be finite and > 0"));
        }
        if !self.item_padding_secs.is_finite() || self.item_padding_secs < 0.0 {
            return Err(NewsreelError::validation(
                "item_padding_secs must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Timing of one scene before any pixels exist.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannedScene {
    pub scene_index: usize,
    pub kind: SegmentKind,
    pub start_secs: f64,
    pub duration_secs: f64,
}

impl PlannedScene {
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }

    /// Frames covered by this scene, start and end each rounded to the nearest frame.
    pub fn frame_span(&self, fps: Fps) -> FrameRange {
        FrameRange {
            start: FrameIndex(fps.secs_to_frames_round(self.start_secs)),
            end: FrameIndex(fps.secs_to_frames_round(self.end_secs())),
        }
    }
}

/// Contiguous scene timing: scene `i` starts where scene `i - 1` ends, the first at zero.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScenePlan {
    scenes: Vec<PlannedScene>,
    total_secs: f64,
    config: TimelineConfig,
}

impl ScenePlan {
    /// Pair item segments with narration results positionally and lay the scenes end to end.
    ///
    /// `segments` must read intro, items, ending. `narrations` holds exactly one result per item
    /// segment, in the same order; intro and ending take their fixed durations from `config`.
    pub fn build(
        segments: &[ScriptSegment],
        narrations: &[NarrationResult],
        config: &TimelineConfig,
    ) -> NewsreelResult<Self> {
        config.validate()?;
        check_segment_order(segments)?;

        let item_count = segments.len() - 2;
        if narrations.len() != item_count {
            return Err(NewsreelError::timeline(format!(
                "got {} narration results for {item_count} item segments",
                narrations.len()
            )));
        }

        let mut narrated = narrations.iter();
        let mut scenes = Vec::with_capacity(segments.len());
        let mut cursor = 0.0f64;
        for (scene_index, segment) in segments.iter().enumerate() {
            let duration_secs = match segment.kind {
                SegmentKind::Intro => config.intro_secs,
                SegmentKind::Ending => config.ending_secs,
                SegmentKind::Item(item) => {
                    let narration = narrated.next().ok_or_else(|| {
                        NewsreelError::timeline(format!("no narration for item {item}"))
                    })?;
                    if !matches!(narration.segment.kind, SegmentKind::Item(_)) {
                        return Err(NewsreelError::timeline(format!(
                            "narration paired with item {item} belongs to a {:?} segment",
                            narration.segment.kind
                        )));
                    }
                    if !narration.duration_secs.is_finite() || narration.duration_secs <= 0.0 {
                        return Err(NewsreelError::timeline(format!(
                            "narration for item {item} has unusable duration {}",
                            narration.duration_secs
                        )));
                    }
                    narration.duration_secs + config.item_padding_secs
                }
            };
            scenes.push(PlannedScene {
                scene_index,
                kind: segment.kind,
                start_secs: cursor,
                duration_secs,
            });
            cursor += duration_secs;
        }

        let plan = Self {
            scenes,
            total_secs: cursor,
            config: config.clone(),
        };
        plan.check_contiguous()?;
        Ok(plan)
    }

    pub fn scenes(&self) -> &[PlannedScene] {
        &self.scenes
    }

    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn item_count(&self) -> usize {
        self.scenes
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Item(_)))
            .count()
    }

    /// Bind one rendered frame to every planned scene, matching on `scene_index`.
    pub fn attach_frames(&self, frames: Vec<RenderedFrame>) -> NewsreelResult<SceneTimeline> {
        let mut slots: Vec<Option<RenderedFrame>> = vec![None; self.scenes.len()];
        for frame in frames {
            let idx = frame.scene_index;
            let slot = slots.get_mut(idx).ok_or_else(|| {
                NewsreelError::timeline(format!(
                    "frame for scene {idx} but the plan has {} scenes",
                    self.scenes.len()
                ))
            })?;
            if slot.is_some() {
                return Err(NewsreelError::timeline(format!(
                    "duplicate frame for scene {idx}"
                )));
            }
            *slot = Some(frame);
        }

        let scenes = self
            .scenes
            .iter()
            .zip(slots)
            .map(|(planned, frame)| {
                let frame = frame.ok_or_else(|| {
                    NewsreelError::timeline(format!(
                        "no frame rendered for scene {}",
                        planned.scene_index
                    ))
                })?;
                Ok(TimedScene {
                    scene_index: planned.scene_index,
                    kind: planned.kind,
                    start_secs: planned.start_secs,
                    duration_secs: planned.duration_secs,
                    frame,
                })
            })
            .collect::<NewsreelResult<Vec<_>>>()?;
        Ok(SceneTimeline { scenes })
    }

    fn check_contiguous(&self) -> NewsreelResult<()> {
        let mut expected_start = 0.0f64;
        for scene in &self.scenes {
            if scene.start_secs != expected_start {
                return Err(NewsreelError::timeline(format!(
                    "scene {} starts at {} but the previous scene ends at {expected_start}",
                    scene.scene_index, scene.start_secs
                )));
            }
            if !scene.duration_secs.is_finite() || scene.duration_secs < 0.0 {
                return Err(NewsreelError::timeline(format!(
                    "scene {} has invalid duration {}",
                    scene.scene_index, scene.duration_secs
                )));
            }
            expected_start += scene.duration_secs;
        }
        if !expected_start.is_finite() || expected_start != self.total_secs {
            return Err(NewsreelError::timeline("total duration does not match scenes"));
        }
        Ok(())
    }
}

fn check_segment_order(segments: &[ScriptSegment]) -> NewsreelResult<()> {
    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return Err(NewsreelError::timeline("script has no segments"));
    };
    if segments.len() < 2 || first.kind != SegmentKind::Intro || last.kind != SegmentKind::Ending
    {
        return Err(NewsreelError::timeline(
            "script must start with an intro and end with an ending",
        ));
    }
    for (pos, segment) in segments[1..segments.len() - 1].iter().enumerate() {
        if segment.kind != SegmentKind::Item(pos) {
            return Err(NewsreelError::timeline(format!(
                "segment {} should be item {pos}, found {:?}",
                pos + 1,
                segment.kind
            )));
        }
    }
    Ok(())
}

/// A planned scene with its frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedScene {
    pub scene_index: usize,
    pub kind: SegmentKind,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub frame: RenderedFrame,
}

/// Ordered, read-only sequence of [`TimedScene`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneTimeline {
    scenes: Vec<TimedScene>,
}

impl SceneTimeline {
    /// Assemble a timeline from already-timed scenes. Scenes must be indexed `0..n` in order and
    /// laid end to end from zero.
    pub fn from_scenes(scenes: Vec<TimedScene>) -> NewsreelResult<Self> {
        let mut expected_start = 0.0f64;
        for (pos, scene) in scenes.iter().enumerate() {
            if scene.scene_index != pos {
                return Err(NewsreelError::timeline(format!(
                    "scene at position {pos} has index {}",
                    scene.scene_index
                )));
            }
            if scene.start_secs != expected_start
                || !scene.duration_secs.is_finite()
                || scene.duration_secs < 0.0
            {
                return Err(NewsreelError::timeline(format!(
                    "scene {pos} is not contiguous with the previous scene"
                )));
            }
            expected_start += scene.duration_secs;
        }
        Ok(Self { scenes })
    }

    pub fn scenes(&self) -> &[TimedScene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.scenes.iter().map(|s| s.duration_secs).collect()
    }

    pub fn total_secs(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration_secs).sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
