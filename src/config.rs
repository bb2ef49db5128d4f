use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::narration::binder::VoiceId;
use crate::render::theme::Theme;
use crate::script::ScriptOptions;
use crate::timeline::plan::TimelineConfig;

/// Environment variable overriding [`RunConfig::voice`].
pub const ENV_VOICE: &str = "TTS_VOICE";
/// Environment variable overriding [`RunConfig::use_mock_news`].
pub const ENV_USE_MOCK_NEWS: &str = "USE_MOCK_NEWS";
/// Environment variable overriding [`RunConfig::max_items`].
pub const ENV_MAX_ITEMS: &str = "MAX_NEWS_ITEMS";

/// Font files tried in order when no font is configured. CJK-capable fonts come first.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

/// Settings for one generation run.
///
/// Layered as defaults, then a JSON file, then environment variables, then command line flags.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub voice: VoiceId,
    pub use_mock_news: bool,
    pub max_items: usize,
    pub intro_secs: f64,
    pub ending_secs: f64,
    pub item_padding_secs: f64,
    pub fps: u32,
    pub workers: usize,
    pub news_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub font_path: Option<PathBuf>,
    pub program_name: String,
    pub tagline: String,
    pub closing_text: String,
    pub closing_subtext: String,
    pub width: u32,
    pub height: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        let timeline = TimelineConfig::default();
        let script = ScriptOptions::new(NaiveDate::default());
        Self {
            voice: VoiceId::default(),
            use_mock_news: false,
            max_items: 8,
            intro_secs: timeline.intro_secs,
            ending_secs: timeline.ending_secs,
            item_padding_secs: timeline.item_padding_secs,
            fps: 30,
            workers: 4,
            news_file: None,
            output_dir: PathBuf::from("output"),
            font_path: None,
            program_name: script.program_name,
            tagline: script.tagline,
            closing_text: script.closing_text,
            closing_subtext: script.closing_subtext,
            width: 1920,
            height: 1080,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> NewsreelResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| NewsreelError::validation(format!("config json parse failed: {e}")))
    }

    pub fn from_json_file(path: &Path) -> NewsreelResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    /// Apply `TTS_VOICE`, `USE_MOCK_NEWS` and `MAX_NEWS_ITEMS` from the process environment.
    pub fn apply_env(&mut self) -> NewsreelResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Like [`apply_env`](Self::apply_env) with an explicit variable lookup.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> NewsreelResult<()> {
        if let Some(v) = lookup(ENV_VOICE).filter(|v| !v.trim().is_empty()) {
            self.voice = v.parse()?;
        }
        if let Some(v) = lookup(ENV_USE_MOCK_NEWS).filter(|v| !v.trim().is_empty()) {
            self.use_mock_news = parse_bool(&v).ok_or_else(|| {
                NewsreelError::validation(format!("{ENV_USE_MOCK_NEWS}='{v}' is not a boolean"))
            })?;
        }
        if let Some(v) = lookup(ENV_MAX_ITEMS).filter(|v| !v.trim().is_empty()) {
            self.max_items = v.trim().parse().map_err(|_| {
                NewsreelError::validation(format!("{ENV_MAX_ITEMS}='{v}' is not a count"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> NewsreelResult<()> {
        self.timeline_config().validate()?;
        self.canvas().validate()?;
        if self.fps == 0 {
            return Err(NewsreelError::validation("fps must be > 0"));
        }
        if self.workers == 0 {
            return Err(NewsreelError::validation("workers must be >= 1"));
        }
        if self.max_items == 0 {
            return Err(NewsreelError::validation("max_items must be >= 1"));
        }
        if self.program_name.trim().is_empty() {
            return Err(NewsreelError::validation("program_name must not be empty"));
        }
        Ok(())
    }

    pub fn timeline_config(&self) -> TimelineConfig {
        TimelineConfig {
            intro_secs: self.intro_secs,
            ending_secs: self.ending_secs,
            item_padding_secs: self.item_padding_secs,
        }
    }

    pub fn fps(&self) -> NewsreelResult<Fps> {
        Fps::integer(self.fps)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn script_options(&self, date: NaiveDate) -> ScriptOptions {
        ScriptOptions {
            program_name: self.program_name.clone(),
            tagline: self.tagline.clone(),
            closing_text: self.closing_text.clone(),
            closing_subtext: self.closing_subtext.clone(),
            date,
        }
    }

    /// Theme scaled to the configured canvas, with the configured font if any.
    pub fn theme(&self) -> NewsreelResult<Theme> {
        let theme = Theme::for_canvas(self.canvas());
        let theme = match &self.font_path {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read font '{}'", path.display()))?;
                theme.with_font(bytes)
            }
            None => theme,
        };
        theme.validate()?;
        Ok(theme)
    }
}

/// First existing file from [`FONT_CANDIDATES`].
pub fn probe_system_font() -> Option<PathBuf> {
    let found = FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file());
    match &found {
        Some(path) => debug!(path = %path.display(), "using system font"),
        None => warn!("no system font found; text is drawn as block glyphs"),
    }
    found
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/mod.rs"]
mod tests;
