use std::collections::HashSet;

/// One news story as delivered by a [`NewsSource`](crate::NewsSource).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NewsItem {
    /// Headline.
    pub title: String,
    /// Summary text read out and shown on the card.
    pub body: String,
    /// Position in the broadcast; lower ranks come first.
    #[serde(default)]
    pub rank: u32,
    /// Where the story came from (metadata only).
    #[serde(default)]
    pub source: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, body: impl Into<String>, rank: u32) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            rank,
            source: String::new(),
        }
    }
}

/// Title key used for de-duplication: lowercase alphanumerics (CJK included), everything else
/// dropped.
pub fn normalized_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// De-duplicate by normalized title (first occurrence wins), order by rank, cap to `max_items`
/// and renumber ranks `0..n`.
///
/// Items whose title normalizes to nothing are dropped. Sorting is stable, so equal ranks keep
/// source order.
pub fn select_items(items: Vec<NewsItem>, max_items: usize) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    let mut unique: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| {
            let key = normalized_title(&item.title);
            !key.is_empty() && seen.insert(key)
        })
        .collect();

    unique.sort_by_key(|item| item.rank);
    unique.truncate(max_items);
    for (rank, item) in unique.iter_mut().enumerate() {
        item.rank = rank as u32;
    }
    unique
}

#[cfg(test)]
#[path = "../../tests/unit/news/model.rs"]
mod tests;
