use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tracing::info;

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::news::model::NewsItem;

/// Supplier of candidate news items for one run.
pub trait NewsSource {
    /// Fetch candidates. Ranking and capping happen afterwards in [`select_items`](crate::select_items).
    fn fetch(&self) -> NewsreelResult<Vec<NewsItem>>;
}

/// Fixed in-memory stories used for tests, demos and as the fallback when nothing else yields items.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockNews;

impl MockNews {
    pub fn items() -> Vec<NewsItem> {
        let stories = [
            (
                "AI diagnostics reach a milestone in early cancer screening",
                "A new study reports that AI-assisted diagnosis now exceeds 95% accuracy in early cancer detection, a shift that could change how hospitals screen patients.",
                "Science Daily",
            ),
            (
                "Global climate summit reaches new consensus",
                "Delegates pledged deeper emission cuts, targeting a 40% reduction in carbon output before 2030.",
                "World Desk",
            ),
            (
                "Electric vehicle sales hit a record high",
                "Sales in the first three quarters grew more than 60% year on year, pushing market share past 30%.",
                "Business Wire",
            ),
            (
                "Space station construction passes a key milestone",
                "The latest docking mission completed on schedule, laying the groundwork for upcoming science experiments.",
                "Aerospace News",
            ),
            (
                "New education reform announced",
                "The education ministry published a policy emphasizing creativity and well-rounded learning while reducing homework load.",
                "Education Weekly",
            ),
        ];

        stories
            .into_iter()
            .enumerate()
            .map(|(rank, (title, body, source))| NewsItem {
                title: title.to_string(),
                body: body.to_string(),
                rank: rank as u32,
                source: source.to_string(),
            })
            .collect()
    }
}

impl NewsSource for MockNews {
    fn fetch(&self) -> NewsreelResult<Vec<NewsItem>> {
        let items = Self::items();
        info!(count = items.len(), "using mock news items");
        Ok(items)
    }
}

/// Reads a JSON array of news items from disk.
///
/// `rank` defaults to the array position when absent; `source` defaults to the file name.
#[derive(Clone, Debug)]
pub struct JsonFileNews {
    path: PathBuf,
}

#[derive(serde::Deserialize)]
struct JsonNewsEntry {
    title: String,
    #[serde(alias = "summary", alias = "content")]
    body: String,
    rank: Option<u32>,
    source: Option<String>,
}

impl JsonFileNews {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(json: &str, default_source: &str) -> NewsreelResult<Vec<NewsItem>> {
        let entries: Vec<JsonNewsEntry> = serde_json::from_str(json)
            .map_err(|e| NewsreelError::validation(format!("news json parse failed: {e}")))?;
        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(idx, e)| NewsItem {
                title: e.title,
                body: e.body,
                rank: e.rank.unwrap_or(idx as u32),
                source: e.source.unwrap_or_else(|| default_source.to_string()),
            })
            .collect())
    }
}

impl NewsSource for JsonFileNews {
    fn fetch(&self) -> NewsreelResult<Vec<NewsItem>> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read news file '{}'", self.path.display()))?;
        let source = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let items = Self::parse(&json, &source)?;
        info!(count = items.len(), path = %self.path.display(), "loaded news items");
        Ok(items)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/news/source.rs"]
mod tests;
