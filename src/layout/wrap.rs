use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Marker appended to the last kept line when wrapped content is truncated.
pub const ELLIPSIS: char = '\u{2026}';

/// Horizontal glyph metrics used for measuring text before it is rasterized.
pub trait FontMetrics: Send + Sync {
    /// Advance of `ch` in em units. Pixel width is `advance_em * size_px`.
    fn advance_em(&self, ch: char) -> f32;
}

/// Two-class metrics: Latin-like glyphs advance `narrow_em`, CJK/fullwidth glyphs `wide_em`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MonoMetrics {
    pub narrow_em: f32,
    pub wide_em: f32,
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self {
            narrow_em: 0.55,
            wide_em: 1.0,
        }
    }
}

impl FontMetrics for MonoMetrics {
    fn advance_em(&self, ch: char) -> f32 {
        if is_wide(ch) {
            self.wide_em
        } else {
            self.narrow_em
        }
    }
}

/// Glyphs that occupy a full em and wrap individually (CJK ideographs, kana, hangul, fullwidth forms).
pub fn is_wide(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x1100..=0x115F
            | 0x2E80..=0x303F
            | 0x3040..=0x30FF
            | 0x3100..=0x31FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xAC00..=0xD7AF
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x2FFFD
    )
}

/// Pixel width of `text` at `size_px`.
pub fn measure(text: &str, metrics: &dyn FontMetrics, size_px: f32) -> f32 {
    text.chars().map(|ch| metrics.advance_em(ch) * size_px).sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    space_before: bool,
}

/// Split into wrap units: whitespace-separated words, with every wide glyph as its own unit that
/// joins its neighbours without a space.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut word: Option<(usize, bool)> = None;
    let mut pending_space = false;

    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            flush_word(text, &mut out, &mut word, i);
            pending_space = !out.is_empty();
        } else if is_wide(ch) {
            flush_word(text, &mut out, &mut word, i);
            out.push(Token {
                text: &text[i..i + ch.len_utf8()],
                space_before: pending_space,
            });
            pending_space = false;
        } else if word.is_none() {
            word = Some((i, pending_space));
            pending_space = false;
        }
    }
    flush_word(text, &mut out, &mut word, text.len());
    out
}

fn flush_word<'a>(
    text: &'a str,
    out: &mut Vec<Token<'a>>,
    word: &mut Option<(usize, bool)>,
    end: usize,
) {
    if let Some((start, space_before)) = word.take() {
        out.push(Token {
            text: &text[start..end],
            space_before,
        });
    }
}

/// Text size and wrap width must both be finite and positive.
pub(crate) fn check_sizes(max_width: f32, size_px: f32) -> NewsreelResult<()> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(NewsreelError::layout("text size_px must be finite and > 0"));
    }
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(NewsreelError::layout("max_width must be finite and > 0"));
    }
    Ok(())
}

fn check_inputs(
    text: &str,
    max_width: f32,
    metrics: &dyn FontMetrics,
    size_px: f32,
) -> NewsreelResult<()> {
    check_sizes(max_width, size_px)?;
    let needs_space = text.chars().any(char::is_whitespace);
    let glyphs = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .chain(needs_space.then_some(' '));
    for ch in glyphs {
        let adv = metrics.advance_em(ch);
        if !adv.is_finite() || adv <= 0.0 {
            return Err(NewsreelError::layout(format!(
                "font metrics report non-positive advance {adv} for {ch:?}"
            )));
        }
    }
    Ok(())
}

/// Greedy wrap of `text` into lines no wider than `max_width` pixels.
///
/// A unit wider than `max_width` is never split: it is placed alone on its own line, which is
/// then the only kind of line allowed to exceed the width.
pub fn wrap(
    text: &str,
    max_width: f32,
    metrics: &dyn FontMetrics,
    size_px: f32,
) -> NewsreelResult<Vec<String>> {
    check_inputs(text, max_width, metrics, size_px)?;
    Ok(wrap_by(text, max_width, |line| measure(line, metrics, size_px)))
}

/// [`wrap`] with an arbitrary line measure, e.g. a shaped width from the real font.
///
/// `line_width` must not shrink when text is appended.
pub fn wrap_by(
    text: &str,
    max_width: f32,
    mut line_width: impl FnMut(&str) -> f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for tok in tokenize(text) {
        if current.is_empty() {
            current.push_str(tok.text);
            continue;
        }

        let mut candidate = current.clone();
        if tok.space_before {
            candidate.push(' ');
        }
        candidate.push_str(tok.text);

        if line_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(tok.text);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Apply the overflow policy: keep at most `max_lines`, and when anything was dropped end the
/// last kept line with [`ELLIPSIS`], trimmed until it fits `max_width`.
pub fn clamp_lines(
    lines: &[String],
    max_lines: usize,
    metrics: &dyn FontMetrics,
    size_px: f32,
    max_width: f32,
) -> Vec<String> {
    clamp_lines_by(lines, max_lines, max_width, |line| {
        measure(line, metrics, size_px)
    })
}

/// [`clamp_lines`] with an arbitrary line measure.
pub fn clamp_lines_by(
    lines: &[String],
    max_lines: usize,
    max_width: f32,
    mut line_width: impl FnMut(&str) -> f32,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines.to_vec();
    }
    if max_lines == 0 {
        return Vec::new();
    }

    let mut kept = lines[..max_lines].to_vec();
    if let Some(last) = kept.last_mut() {
        let mut base = last.trim_end().to_string();
        loop {
            let candidate = format!("{base}{ELLIPSIS}");
            if base.is_empty() || line_width(&candidate) <= max_width {
                *last = candidate;
                break;
            }
            base.pop();
            base.truncate(base.trim_end().len());
        }
    }
    kept
}

/// [`wrap`] followed by [`clamp_lines`].
pub fn wrap_clamped(
    text: &str,
    max_width: f32,
    metrics: &dyn FontMetrics,
    size_px: f32,
    max_lines: usize,
) -> NewsreelResult<Vec<String>> {
    let lines = wrap(text, max_width, metrics, size_px)?;
    Ok(clamp_lines(&lines, max_lines, metrics, size_px, max_width))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
