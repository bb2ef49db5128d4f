use super::*;
use crate::foundation::core::Canvas;
use crate::render::theme::ThemeLayout;

fn small_theme() -> Arc<Theme> {
    Arc::new(Theme::for_canvas(Canvas {
        width: 480,
        height: 270,
    }))
}

fn intro() -> SceneDescriptor {
    SceneDescriptor {
        index: 0,
        kind: SceneKind::Intro {
            title: "World in Five".to_string(),
            date: "Oct 14 Wednesday".to_string(),
            tagline: "Five minutes a day".to_string(),
        },
    }
}

fn item(body: &str) -> SceneDescriptor {
    SceneDescriptor {
        index: 1,
        kind: SceneKind::Item {
            header: "World in Five".to_string(),
            date: "Oct 14".to_string(),
            title: "Global climate summit reaches new consensus".to_string(),
            body: body.to_string(),
            position: 1,
            total: 3,
        },
    }
}

fn ending() -> SceneDescriptor {
    SceneDescriptor {
        index: 2,
        kind: SceneKind::Ending {
            text: "Thanks for watching".to_string(),
            subtext: "See you tomorrow".to_string(),
        },
    }
}

fn row_mean_blue(frame: &RenderedFrame, row: u32) -> f64 {
    let stride = frame.width as usize * 4;
    let start = row as usize * stride;
    let px = &frame.data[start..start + stride];
    let sum: u64 = px.chunks_exact(4).map(|p| u64::from(p[2])).sum();
    sum as f64 / f64::from(frame.width)
}

#[test]
fn frame_has_canvas_dimensions_and_scene_index() {
    let mut composer = FrameComposer::new(small_theme()).unwrap();
    let frame = composer.render(&item("Short body.")).unwrap();
    assert_eq!(frame.scene_index, 1);
    assert_eq!((frame.width, frame.height), (480, 270));
    assert_eq!(frame.data.len(), 480 * 270 * 4);
    frame.validate().unwrap();
}

#[test]
fn rendering_is_deterministic_across_composers() {
    let theme = small_theme();
    let mut a = FrameComposer::new(Arc::clone(&theme)).unwrap();
    let mut b = FrameComposer::new(theme).unwrap();
    for scene in [intro(), item("Body text for the card."), ending()] {
        assert_eq!(a.render(&scene).unwrap(), b.render(&scene).unwrap());
    }
}

#[test]
fn scene_kinds_render_differently() {
    let mut composer = FrameComposer::new(small_theme()).unwrap();
    let i = composer.render(&intro()).unwrap();
    let c = composer.render(&item("Body")).unwrap();
    let e = composer.render(&ending()).unwrap();
    assert_ne!(i.data, c.data);
    assert_ne!(c.data, e.data);
    assert_ne!(i.data, e.data);
}

#[test]
fn background_gradient_darkens_toward_the_top() {
    let mut composer = FrameComposer::new(small_theme()).unwrap();
    let frame = composer.render(&intro()).unwrap();
    assert!(row_mean_blue(&frame, 0) < row_mean_blue(&frame, 269));
}

#[test]
fn overlong_body_is_clamped_not_rejected() {
    let mut composer = FrameComposer::new(small_theme()).unwrap();
    let body = "word ".repeat(400);
    composer.render(&item(&body)).unwrap();
}

#[test]
fn odd_canvas_is_rejected() {
    let theme = Theme::for_canvas(Canvas {
        width: 481,
        height: 270,
    });
    assert!(FrameComposer::new(Arc::new(theme)).is_err());
}

#[test]
fn progress_fraction_tracks_position() {
    assert_eq!(progress_fraction(1, 4), 0.25);
    assert_eq!(progress_fraction(4, 4), 1.0);
    assert_eq!(progress_fraction(9, 4), 1.0);
    assert_eq!(progress_fraction(0, 0), 0.0);
}

#[test]
fn ray_quad_is_closed_four_corner_path() {
    let path = ray_quad(Point::new(0.0, 0.0), 0.0, 10.0, 20.0, 2.0);
    let bbox = path.bounding_box();
    assert!((bbox.x0 - 10.0).abs() < 1e-9 && (bbox.x1 - 20.0).abs() < 1e-9);
    assert!((bbox.y0 + 1.0).abs() < 1e-9 && (bbox.y1 - 1.0).abs() < 1e-9);
}

const LONG_TITLE: &str = "Parliament approves sweeping overhaul of national infrastructure \
    spending after marathon overnight session with record amendments";
const LONG_BODY: &str = "Lawmakers worked through the night to reconcile competing versions \
    of the bill, which allocates funding for bridges, broadband, water systems and regional \
    rail. Supporters called it a generational investment while critics warned about long term \
    maintenance costs and the pace of procurement across several provinces and territories.";

fn system_font_theme() -> Option<Theme> {
    let path = crate::config::probe_system_font()?;
    let bytes = std::fs::read(path).ok()?;
    Some(Theme::default().with_font(bytes))
}

#[test]
fn shaped_item_lines_fit_card_width() {
    let Some(theme) = system_font_theme() else {
        return;
    };
    let mut painter = TextPainter::new(&theme).unwrap();
    let limit = card_text_width(&theme);
    let layout = &theme.layout;

    for (text, size_px, max_lines) in [
        (LONG_TITLE, layout.item_title_px, layout.item_title_max_lines),
        (LONG_BODY, layout.item_body_px, layout.item_body_max_lines),
    ] {
        let lines = painter.wrap_clamped(text, limit, size_px, max_lines).unwrap();
        assert!(!lines.is_empty());
        assert!(lines.len() <= max_lines);
        for line in &lines {
            let drawn = painter.line_width(line, size_px);
            assert!(drawn <= limit, "line {line:?} is {drawn}px, limit {limit}px");
        }
    }

    let mut composer = FrameComposer::new(Arc::new(theme)).unwrap();
    composer.render(&item(LONG_BODY)).unwrap();
}

#[test]
fn block_glyph_wrap_matches_theme_metrics() {
    let theme = Theme::default();
    let mut painter = TextPainter::new(&theme).unwrap();
    let limit = card_text_width(&theme);
    let size_px = theme.layout.item_body_px;
    let expected =
        crate::layout::wrap::wrap_clamped(LONG_BODY, limit, &theme.metrics, size_px, 3).unwrap();
    assert_eq!(painter.wrap_clamped(LONG_BODY, limit, size_px, 3).unwrap(), expected);
}

#[test]
fn indicator_ends_at_right_margin() {
    let theme = small_theme();
    let (right, size_px) = (theme.layout.indicator_right, theme.layout.indicator_px);
    let frame_w = f64::from(theme.canvas.width);
    let mut composer = FrameComposer::new(theme).unwrap();

    for indicator in ["1 / 3", "12 / 12"] {
        let x = composer.indicator_x(indicator);
        let width = f64::from(composer.text.line_width(indicator, size_px));
        assert!((x + width - (frame_w - right)).abs() < 1e-3, "{indicator}");
    }
    let short = composer.indicator_x("1 / 3");
    let long = composer.indicator_x("12 / 12");
    assert!(long < short);
}

#[test]
fn date_shadow_and_gold_step_scale_with_canvas() {
    let base = ThemeLayout::default();
    assert_eq!(base.intro_date_shadow_px, 1.0);
    assert_eq!(base.gold_step_frac, 0.04);
    let scaled = base.scaled(2.0);
    assert_eq!(scaled.intro_date_shadow_px, 2.0);
    assert_eq!(scaled.gold_step_frac, 0.04);
}
