//! Newsreel turns a day's news items into a narrated, fixed-resolution MP4.
//!
//! A run goes through five stages:
//!
//! - Select and script news items ([`Script`])
//! - Synthesize one narration clip per item ([`NarrationBinder`])
//! - Derive scene durations from narration ([`ScenePlan`]) and render one still per scene
//!   ([`FrameComposer`])
//! - Concatenate narration into a soundtrack ([`AudioTrack`]) and check it against the video
//!   timeline ([`EncodingRequest`])
//! - Hand the request to an encoder ([`Encode`])
//!
//! [`run`] wires these together; every external service sits behind a trait so runs can be
//! driven with fakes.
#![forbid(unsafe_code)]

pub mod audio;
pub mod config;
pub mod encode;
mod foundation;
pub mod layout;
pub mod narration;
pub mod news;
pub mod pipeline;
pub mod render;
pub mod script;
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{NewsreelError, NewsreelResult};

pub use crate::audio::pcm::{AudioPcm, DecodeAudio, FfmpegDecoder};
pub use crate::audio::track::AudioTrack;
pub use crate::config::RunConfig;
pub use crate::encode::ffmpeg::{Encode, FfmpegEncoder, InMemoryEncoder, is_ffmpeg_on_path};
pub use crate::encode::request::EncodingRequest;
pub use crate::layout::wrap::{FontMetrics, MonoMetrics, clamp_lines, measure, wrap, wrap_clamped};
pub use crate::narration::binder::{
    AudioHandle, Narration, NarrationBinder, NarrationResult, Synthesize, VoiceId,
};
pub use crate::narration::edge_tts::EdgeTtsCommand;
pub use crate::news::model::{NewsItem, select_items};
pub use crate::news::source::{JsonFileNews, MockNews, NewsSource};
pub use crate::pipeline::{Collaborators, RunMetadata, RunOutput, run};
pub use crate::render::compose::FrameComposer;
pub use crate::render::frame::RenderedFrame;
pub use crate::render::theme::Theme;
pub use crate::script::{
    SceneDescriptor, SceneKind, Script, ScriptOptions, ScriptSegment, SegmentKind,
};
pub use crate::timeline::plan::{
    PlannedScene, ScenePlan, SceneTimeline, TimedScene, TimelineConfig,
};
pub use crate::timeline::render::render_scenes;
