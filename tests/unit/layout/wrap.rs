use super::*;

// Every narrow glyph is exactly 10px at size 10, wide glyphs 20px.
fn unit_metrics() -> MonoMetrics {
    MonoMetrics {
        narrow_em: 1.0,
        wide_em: 2.0,
    }
}

struct BrokenMetrics;

impl FontMetrics for BrokenMetrics {
    fn advance_em(&self, ch: char) -> f32 {
        if ch == 'x' { 0.0 } else { 1.0 }
    }
}

#[test]
fn greedy_wrap_fills_lines() {
    let m = unit_metrics();
    let lines = wrap("the quick brown fox jumps", 110.0, &m, 10.0).unwrap();
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
}

#[test]
fn no_line_exceeds_width_except_lone_long_word() {
    let m = unit_metrics();
    let text = "a bb ccc dddd supercalifragilistic eeeee f gg hhh";
    let max = 60.0;
    let lines = wrap(text, max, &m, 10.0).unwrap();
    for line in &lines {
        let w = measure(line, &m, 10.0);
        if w > max {
            assert!(!line.contains(' '), "overflowing line must be one word: {line:?}");
        }
    }
    assert!(lines.iter().any(|l| l == "supercalifragilistic"));
    let rejoined = lines.join(" ");
    assert_eq!(rejoined, text);
}

#[test]
fn forty_char_word_overflows_on_its_own_line() {
    let m = unit_metrics();
    let word = "w".repeat(40);
    let text = format!("lead {word} tail");
    let lines = wrap(&text, 200.0, &m, 10.0).unwrap();
    assert_eq!(lines, vec!["lead".to_string(), word.clone(), "tail".to_string()]);
    assert!(measure(&lines[1], &m, 10.0) > 200.0);

    let alone = wrap(&word, 200.0, &m, 10.0).unwrap();
    assert_eq!(alone, vec![word]);
}

#[test]
fn wide_glyphs_wrap_per_character() {
    let m = unit_metrics();
    let lines = wrap("人工智能技术", 60.0, &m, 10.0).unwrap();
    assert_eq!(lines, vec!["人工智", "能技术"]);

    let mixed = wrap("AI技术 new", 60.0, &m, 10.0).unwrap();
    assert_eq!(mixed, vec!["AI技术", "new"]);
}

#[test]
fn empty_and_whitespace_text_yield_no_lines() {
    let m = unit_metrics();
    assert!(wrap("", 50.0, &m, 10.0).unwrap().is_empty());
    assert!(wrap("   \n\t", 50.0, &m, 10.0).unwrap().is_empty());
}

#[test]
fn wrap_is_idempotent() {
    let m = MonoMetrics::default();
    let text = "Global climate summit reaches new consensus on emission cuts";
    let a = wrap(text, 300.0, &m, 35.0).unwrap();
    let b = wrap(text, 300.0, &m, 35.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn bad_metrics_and_sizes_are_layout_errors() {
    let err = wrap("box", 100.0, &BrokenMetrics, 10.0).unwrap_err();
    assert!(matches!(err, NewsreelError::Layout(_)));
    assert!(wrap("ok", 100.0, &BrokenMetrics, 10.0).is_ok());

    let m = unit_metrics();
    assert!(matches!(
        wrap("ok", 100.0, &m, 0.0),
        Err(NewsreelError::Layout(_))
    ));
    assert!(matches!(
        wrap("ok", f32::NAN, &m, 10.0),
        Err(NewsreelError::Layout(_))
    ));
}

#[test]
fn clamp_appends_ellipsis_and_fits_width() {
    let m = unit_metrics();
    let lines: Vec<String> = ["aaaa bbbb", "cccc dddd", "eeee"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let out = clamp_lines(&lines, 2, &m, 10.0, 90.0);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], "aaaa bbbb");
    assert!(out[1].ends_with(ELLIPSIS));
    assert!(measure(&out[1], &m, 10.0) <= 90.0);
    assert_eq!(out[1], format!("cccc ddd{ELLIPSIS}"));

    assert_eq!(clamp_lines(&lines, 3, &m, 10.0, 90.0), lines);
    assert!(clamp_lines(&lines, 0, &m, 10.0, 90.0).is_empty());
}

#[test]
fn wrap_clamped_truncates_long_body() {
    let m = unit_metrics();
    let body = "one two three four five six seven eight nine ten";
    let out = wrap_clamped(body, 100.0, &m, 10.0, 2).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out[1].ends_with(ELLIPSIS));
}

#[test]
fn wrap_by_follows_the_given_line_measure() {
    // Each char is 10px, but the pair "ff" shapes 6px narrower as a ligature.
    let shaped = |line: &str| line.chars().count() as f32 * 10.0 - line.matches("ff").count() as f32 * 6.0;
    let lines = wrap_by("off off off", 75.0, shaped);
    assert_eq!(lines, vec!["off off".to_string(), "off".to_string()]);
    assert!(lines.iter().all(|l| shaped(l) <= 75.0));

    let kept = clamp_lines_by(&lines, 1, 75.0, shaped);
    assert_eq!(kept.len(), 1);
    assert!(kept[0].ends_with(ELLIPSIS));
    assert!(shaped(&kept[0]) <= 75.0);
}
