//! Script and scene descriptors derived from the selected news items.
//!
//! Everything here is a pure function of the items and [`ScriptOptions`]: the same input always
//! yields the same segments and descriptors, which is what makes a run replayable.

use chrono::NaiveDate;

use crate::news::model::NewsItem;

/// Position of a segment in the broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Opening title card.
    Intro,
    /// One news item; the index is its position in rank order.
    Item(usize),
    /// Closing card.
    Ending,
}

/// Narration text for one scene.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptSegment {
    pub kind: SegmentKind,
    pub text: String,
}

/// Branding and date used when generating a [`Script`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptOptions {
    pub program_name: String,
    pub tagline: String,
    pub closing_text: String,
    pub closing_subtext: String,
    pub date: NaiveDate,
}

impl ScriptOptions {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            program_name: "World in Five".to_string(),
            tagline: "Five minutes a day, the whole world's news".to_string(),
            closing_text: "Thanks for watching".to_string(),
            closing_subtext: "See you tomorrow".to_string(),
            date,
        }
    }

    /// Short display date, e.g. `Oct 14`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %d").to_string()
    }

    /// Full weekday name, e.g. `Wednesday`.
    pub fn weekday(&self) -> String {
        self.date.format("%A").to_string()
    }
}

/// The broadcast script: one intro, one segment per item in rank order, one ending.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    pub options: ScriptOptions,
    pub date: String,
    pub weekday: String,
    pub items: Vec<NewsItem>,
    pub segments: Vec<ScriptSegment>,
}

impl Script {
    pub fn from_items(items: &[NewsItem], options: &ScriptOptions) -> Self {
        let mut items = items.to_vec();
        items.sort_by_key(|item| item.rank);

        let date = options.display_date();
        let weekday = options.weekday();

        let mut segments = Vec::with_capacity(items.len() + 2);
        segments.push(ScriptSegment {
            kind: SegmentKind::Intro,
            text: format!(
                "Welcome to {}. Today is {weekday}, {date}. {}",
                options.program_name,
                sentence(&options.tagline)
            ),
        });
        for (idx, item) in items.iter().enumerate() {
            segments.push(ScriptSegment {
                kind: SegmentKind::Item(idx),
                text: format!(
                    "Story {}: {} {}",
                    idx + 1,
                    sentence(&item.title),
                    item.body.trim()
                )
                .trim_end()
                .to_string(),
            });
        }
        segments.push(ScriptSegment {
            kind: SegmentKind::Ending,
            text: format!(
                "That's all for today's news. {} {}",
                sentence(&options.closing_text),
                sentence(&options.closing_subtext)
            ),
        });

        Self {
            options: options.clone(),
            date,
            weekday,
            items,
            segments,
        }
    }

    pub fn opening(&self) -> Option<&ScriptSegment> {
        self.segments.first().filter(|s| s.kind == SegmentKind::Intro)
    }

    pub fn closing(&self) -> Option<&ScriptSegment> {
        self.segments.last().filter(|s| s.kind == SegmentKind::Ending)
    }

    /// Segments that get narrated (the news items).
    pub fn item_segments(&self) -> Vec<ScriptSegment> {
        self.segments
            .iter()
            .filter(|s| matches!(s.kind, SegmentKind::Item(_)))
            .cloned()
            .collect()
    }

    /// One visual descriptor per segment, in segment order.
    pub fn scene_descriptors(&self) -> Vec<SceneDescriptor> {
        let total = self.items.len();
        let date_line = format!("{} {}", self.date, self.weekday);
        self.segments
            .iter()
            .enumerate()
            .map(|(index, seg)| {
                let kind = match seg.kind {
                    SegmentKind::Intro => SceneKind::Intro {
                        title: self.options.program_name.clone(),
                        date: date_line.clone(),
                        tagline: self.options.tagline.clone(),
                    },
                    SegmentKind::Item(i) => {
                        let item = &self.items[i];
                        SceneKind::Item {
                            header: self.options.program_name.clone(),
                            date: self.date.clone(),
                            title: item.title.clone(),
                            body: item.body.clone(),
                            position: i + 1,
                            total,
                        }
                    }
                    SegmentKind::Ending => SceneKind::Ending {
                        text: self.options.closing_text.clone(),
                        subtext: self.options.closing_subtext.clone(),
                    },
                };
                SceneDescriptor { index, kind }
            })
            .collect()
    }
}

/// What a scene shows. Stateless: derived from the script only.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneDescriptor {
    pub index: usize,
    pub kind: SceneKind,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneKind {
    Intro {
        title: String,
        date: String,
        tagline: String,
    },
    Item {
        header: String,
        date: String,
        title: String,
        body: String,
        /// 1-based position among the items.
        position: usize,
        total: usize,
    },
    Ending {
        text: String,
        subtext: String,
    },
}

fn sentence(s: &str) -> String {
    let s = s.trim();
    match s.chars().last() {
        None => String::new(),
        Some(c) if matches!(c, '.' | '!' | '?' | '。' | '！' | '？') => s.to_string(),
        Some(_) => format!("{s}."),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/mod.rs"]
mod tests;
