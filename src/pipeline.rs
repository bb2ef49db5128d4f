//! End-to-end run: news, script, narration, timing, frames, soundtrack, encode, artifacts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use chrono::NaiveDateTime;
use tracing::{info, instrument, warn};

use crate::audio::pcm::{AudioPcm, DecodeAudio, FfmpegDecoder};
use crate::audio::track::AudioTrack;
use crate::config::RunConfig;
use crate::encode::ffmpeg::{Encode, FfmpegEncoder};
use crate::encode::request::EncodingRequest;
use crate::foundation::core::Fps;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::narration::binder::{AudioHandle, NarrationBinder, NarrationResult, Synthesize};
use crate::narration::edge_tts::EdgeTtsCommand;
use crate::news::model::{NewsItem, select_items};
use crate::news::source::{JsonFileNews, MockNews, NewsSource};
use crate::render::compose::FrameComposer;
use crate::render::frame::RenderedFrame;
use crate::render::theme::Theme;
use crate::script::{Script, SegmentKind};
use crate::timeline::plan::ScenePlan;
use crate::timeline::render::render_scenes;

/// External services a run talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub news: Arc<dyn NewsSource>,
    pub synth: Arc<dyn Synthesize>,
    pub decoder: Arc<dyn DecodeAudio>,
    pub encoder: Arc<dyn Encode>,
}

impl Collaborators {
    /// `edge-tts` narration and ffmpeg decode/encode, with the news source picked from `config`.
    pub fn system(config: &RunConfig) -> Self {
        Self {
            news: news_source_for(config),
            synth: Arc::new(EdgeTtsCommand::default()),
            decoder: Arc::new(FfmpegDecoder),
            encoder: Arc::new(FfmpegEncoder::default()),
        }
    }
}

/// Mock news when requested, otherwise the configured JSON file. Without a file the mock list is
/// used as well.
pub fn news_source_for(config: &RunConfig) -> Arc<dyn NewsSource> {
    match (&config.news_file, config.use_mock_news) {
        (Some(path), false) => Arc::new(JsonFileNews::new(path)),
        (None, false) => {
            warn!("no news file configured; using mock news");
            Arc::new(MockNews)
        }
        (_, true) => Arc::new(MockNews),
    }
}

/// Fetch, de-duplicate, rank and cap. An empty selection falls back to the mock items.
pub fn load_items(source: &dyn NewsSource, max_items: usize) -> NewsreelResult<Vec<NewsItem>> {
    let fetched = source.fetch()?;
    let total = fetched.len();
    let mut selected = select_items(fetched, max_items);
    if selected.is_empty() {
        warn!(fetched = total, "no usable news items; falling back to mock news");
        selected = select_items(MockNews::items(), max_items);
    }
    info!(fetched = total, selected = selected.len(), "news selected");
    Ok(selected)
}

/// Files produced by a successful run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub video_path: PathBuf,
    pub script_path: PathBuf,
    pub metadata_path: PathBuf,
    pub script: Script,
    pub plan: ScenePlan,
}

/// Per-scene timing as written to the metadata file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneMetadata {
    pub index: usize,
    pub kind: SegmentKind,
    pub start_secs: f64,
    pub duration_secs: f64,
    pub start_frame: u64,
    pub end_frame: u64,
}

/// Contents of `metadata_YYYYMMDD.json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunMetadata {
    pub title: String,
    pub description: String,
    pub date: String,
    pub weekday: String,
    pub video_file: String,
    pub generated_at: String,
    pub item_count: usize,
    pub opening: String,
    pub closing: String,
    pub item_titles: Vec<String>,
    pub total_secs: f64,
    pub scenes: Vec<SceneMetadata>,
}

impl RunMetadata {
    pub fn new(
        script: &Script,
        plan: &ScenePlan,
        fps: Fps,
        video_file: &str,
        generated_at: NaiveDateTime,
    ) -> Self {
        let count = script.items.len();
        Self {
            title: format!(
                "{} - {} {}",
                script.options.program_name, script.date, script.weekday
            ),
            description: format!(
                "{}. This edition covers {count} {}.",
                script.options.tagline.trim_end_matches('.'),
                if count == 1 { "story" } else { "stories" }
            ),
            date: script.options.date.format("%Y-%m-%d").to_string(),
            weekday: script.weekday.clone(),
            video_file: video_file.to_string(),
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            item_count: count,
            opening: script
                .opening()
                .map(|s| s.text.clone())
                .unwrap_or_default(),
            closing: script
                .closing()
                .map(|s| s.text.clone())
                .unwrap_or_default(),
            item_titles: script.items.iter().map(|i| i.title.clone()).collect(),
            total_secs: plan.total_secs(),
            scenes: plan
                .scenes()
                .iter()
                .map(|s| {
                    let span = s.frame_span(fps);
                    SceneMetadata {
                        index: s.scene_index,
                        kind: s.kind,
                        start_secs: s.start_secs,
                        duration_secs: s.duration_secs,
                        start_frame: span.start.0,
                        end_frame: span.end.0,
                    }
                })
                .collect(),
        }
    }
}

pub fn video_file_name(now: NaiveDateTime) -> String {
    format!("daily_news_{}.mp4", now.format("%Y%m%d_%H%M%S"))
}

pub fn script_file_name(now: NaiveDateTime) -> String {
    format!("script_{}.json", now.format("%Y%m%d"))
}

pub fn metadata_file_name(now: NaiveDateTime) -> String {
    format!("metadata_{}.json", now.format("%Y%m%d"))
}

/// Run the whole pipeline once.
///
/// Intermediates (narration clips) live in a temporary run directory that is removed on return,
/// whether the run succeeds or not. Nothing is written to `config.output_dir` unless encoding
/// succeeds.
#[instrument(skip_all, fields(voice = %config.voice, out_dir = %config.output_dir.display()))]
pub fn run(
    config: &RunConfig,
    theme: Theme,
    collab: &Collaborators,
    now: NaiveDateTime,
) -> NewsreelResult<RunOutput> {
    config.validate()?;
    let fps = config.fps()?;

    let items = load_items(collab.news.as_ref(), config.max_items)?;
    let script = Script::from_items(&items, &config.script_options(now.date()));
    info!(segments = script.segments.len(), "script generated");

    let run_dir = tempfile::Builder::new()
        .prefix("newsreel-run-")
        .tempdir()
        .context("create run directory")?;

    let binder = NarrationBinder::new(Arc::clone(&collab.synth), config.voice, run_dir.path())
        .with_workers(config.workers);
    let narrations = binder.synthesize(&script.item_segments())?;

    let plan = ScenePlan::build(&script.segments, &narrations, &config.timeline_config())?;
    info!(
        scenes = plan.scenes().len(),
        total_secs = plan.total_secs(),
        "scene plan ready"
    );

    let frames = render_scenes(
        Arc::new(theme),
        &script.scene_descriptors(),
        config.workers,
    )?;
    let timeline = plan.attach_frames(frames)?;

    let clips = decode_clips(collab.decoder.as_ref(), &narrations)?;
    let track = AudioTrack::concat_narration(&plan, &clips)?;
    let request = EncodingRequest::build(&timeline, track, fps)?;

    let video_name = video_file_name(now);
    let video_path = config.output_dir.join(&video_name);
    collab.encoder.encode(&request, &video_path)?;

    let script_path = config.output_dir.join(script_file_name(now));
    write_json(&script_path, &script)?;
    let metadata = RunMetadata::new(&script, &plan, fps, &video_name, now);
    let metadata_path = config.output_dir.join(metadata_file_name(now));
    write_json(&metadata_path, &metadata)?;

    info!(
        video = %video_path.display(),
        metadata = %metadata_path.display(),
        "run complete"
    );
    Ok(RunOutput {
        video_path,
        script_path,
        metadata_path,
        script,
        plan,
    })
}

fn decode_clips(
    decoder: &dyn DecodeAudio,
    narrations: &[NarrationResult],
) -> NewsreelResult<Vec<AudioPcm>> {
    narrations
        .iter()
        .map(|n| decoder.decode(n.audio.path()))
        .collect()
}

/// Scene plan for explicit per-item narration durations, without synthesizing anything.
pub fn preview_plan(
    config: &RunConfig,
    items: &[NewsItem],
    durations: &[f64],
    now: NaiveDateTime,
) -> NewsreelResult<(Script, ScenePlan)> {
    let script = Script::from_items(items, &config.script_options(now.date()));
    let item_segments = script.item_segments();
    if durations.len() != item_segments.len() {
        return Err(NewsreelError::timeline(format!(
            "got {} durations for {} items",
            durations.len(),
            item_segments.len()
        )));
    }
    let narrations: Vec<NarrationResult> = item_segments
        .into_iter()
        .zip(durations)
        .enumerate()
        .map(|(i, (segment, d))| NarrationResult {
            segment,
            audio: AudioHandle::new(format!("narration_{i:03}.mp3")),
            duration_secs: *d,
        })
        .collect();
    let plan = ScenePlan::build(&script.segments, &narrations, &config.timeline_config())?;
    Ok((script, plan))
}

/// Render a single scene of the script built from `items`.
pub fn preview_frame(
    config: &RunConfig,
    theme: Theme,
    items: &[NewsItem],
    scene: usize,
    now: NaiveDateTime,
) -> NewsreelResult<RenderedFrame> {
    let script = Script::from_items(items, &config.script_options(now.date()));
    let descriptors = script.scene_descriptors();
    let descriptor = descriptors.get(scene).ok_or_else(|| {
        NewsreelError::validation(format!(
            "scene {scene} out of range (script has {} scenes)",
            descriptors.len()
        ))
    })?;
    FrameComposer::new(Arc::new(theme))?.render(descriptor)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> NewsreelResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize '{}'", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
    info!(path = %path.display(), "wrote artifact");
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
