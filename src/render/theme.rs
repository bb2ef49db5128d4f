use std::sync::Arc;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::layout::wrap::MonoMetrics;

/// Design height all default pixel values are expressed against.
pub const DESIGN_HEIGHT: f64 = 1080.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub background_top: Rgba8,
    pub background_bottom: Rgba8,
    pub ray: Rgba8,
    pub dot: Rgba8,
    pub text: Rgba8,
    pub depth: Rgba8,
    pub accent: Rgba8,
    pub accent_shadow: Rgba8,
    pub gold: Rgba8,
    pub gold_shadow: Rgba8,
    pub gold_highlight: Rgba8,
    pub body: Rgba8,
    pub muted: Rgba8,
    pub subtext: Rgba8,
    pub header_fill: Rgba8,
    pub card_fill: Rgba8,
    pub bar_track: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background_top: Rgba8::rgb(10, 22, 40),
            background_bottom: Rgba8::rgb(25, 42, 70),
            ray: Rgba8::WHITE.with_alpha(30),
            dot: Rgba8::WHITE,
            text: Rgba8::WHITE,
            depth: Rgba8::rgb(0, 0, 100),
            accent: Rgba8::rgb(255, 51, 51),
            accent_shadow: Rgba8::rgb(150, 0, 0),
            gold: Rgba8::rgb(255, 215, 0),
            gold_shadow: Rgba8::rgb(139, 119, 50),
            gold_highlight: Rgba8::rgb(255, 240, 150).with_alpha(110),
            body: Rgba8::rgb(224, 224, 224),
            muted: Rgba8::rgb(170, 170, 170),
            subtext: Rgba8::rgb(204, 204, 204),
            header_fill: Rgba8::rgb(0, 0, 0).with_alpha(100),
            card_fill: Rgba8::WHITE.with_alpha(18),
            bar_track: Rgba8::rgb(51, 51, 51),
        }
    }
}

/// Pixel geometry and font sizes. Defaults target a 1920x1080 canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ThemeLayout {
    pub gradient_band_px: f64,

    /// Ray origin as fractions of the canvas.
    pub ray_origin: (f64, f64),
    pub ray_count: u32,
    pub ray_inner_px: f64,
    pub ray_outer_px: f64,
    pub ray_width_px: f64,

    pub dot_count: u32,
    pub dot_seed: u64,
    pub dot_max_px: f64,
    pub dot_alpha: (u8, u8),

    pub intro_title_px: f32,
    pub intro_title_y: f64,
    pub depth_layers: u32,
    pub depth_step_px: f64,
    pub intro_date_px: f32,
    pub intro_date_gap: f64,
    pub intro_date_shadow_px: f64,
    pub tagline_px: f32,
    pub tagline_bottom: f64,

    pub header_height: f64,
    pub header_margin_x: f64,
    pub header_name_px: f32,
    pub header_date_px: f32,
    pub header_date_right: f64,
    pub indicator_px: f32,
    pub indicator_right: f64,

    pub card_width_frac: f64,
    pub card_height_frac: f64,
    pub card_top: f64,
    pub card_padding: f64,
    pub card_stripe_px: f64,
    pub item_title_px: f32,
    pub item_title_line_h: f64,
    pub item_title_max_lines: usize,
    pub title_body_gap: f64,
    pub item_body_px: f32,
    pub item_body_line_h: f64,
    pub item_body_max_lines: usize,

    pub bar_margin_x: f64,
    pub bar_bottom: f64,
    pub bar_height: f64,

    pub ending_text_px: f32,
    pub ending_sub_px: f32,
    pub ending_gap: f64,
    /// Gold text shadow/highlight offset as a fraction of the text size.
    pub gold_step_frac: f64,
}

impl Default for ThemeLayout {
    fn default() -> Self {
        Self {
            gradient_band_px: 2.0,
            ray_origin: (0.5, 1.0 / 3.0),
            ray_count: 24,
            ray_inner_px: 50.0,
            ray_outer_px: 800.0,
            ray_width_px: 2.0,
            dot_count: 500,
            dot_seed: 42,
            dot_max_px: 3.0,
            dot_alpha: (10, 40),
            intro_title_px: 120.0,
            intro_title_y: 150.0,
            depth_layers: 4,
            depth_step_px: 1.0,
            intro_date_px: 60.0,
            intro_date_gap: 160.0,
            intro_date_shadow_px: 1.0,
            tagline_px: 50.0,
            tagline_bottom: 200.0,
            header_height: 120.0,
            header_margin_x: 50.0,
            header_name_px: 50.0,
            header_date_px: 30.0,
            header_date_right: 200.0,
            indicator_px: 25.0,
            indicator_right: 150.0,
            card_width_frac: 0.9,
            card_height_frac: 0.62,
            card_top: 170.0,
            card_padding: 50.0,
            card_stripe_px: 6.0,
            item_title_px: 55.0,
            item_title_line_h: 70.0,
            item_title_max_lines: 2,
            title_body_gap: 40.0,
            item_body_px: 35.0,
            item_body_line_h: 50.0,
            item_body_max_lines: 6,
            bar_margin_x: 100.0,
            bar_bottom: 80.0,
            bar_height: 8.0,
            ending_text_px: 80.0,
            ending_sub_px: 50.0,
            ending_gap: 150.0,
            gold_step_frac: 0.04,
        }
    }
}

impl ThemeLayout {
    /// Scale every pixel quantity by `k` (fractions, counts and the dot seed are unchanged).
    pub fn scaled(&self, k: f64) -> Self {
        let px = |v: f64| v * k;
        let font = |v: f32| v * k as f32;
        Self {
            gradient_band_px: px(self.gradient_band_px).max(1.0),
            ray_inner_px: px(self.ray_inner_px),
            ray_outer_px: px(self.ray_outer_px),
            ray_width_px: px(self.ray_width_px).max(0.5),
            dot_max_px: px(self.dot_max_px).max(1.0),
            intro_title_px: font(self.intro_title_px),
            intro_title_y: px(self.intro_title_y),
            depth_step_px: px(self.depth_step_px).max(0.5),
            intro_date_px: font(self.intro_date_px),
            intro_date_gap: px(self.intro_date_gap),
            intro_date_shadow_px: px(self.intro_date_shadow_px).max(0.5),
            tagline_px: font(self.tagline_px),
            tagline_bottom: px(self.tagline_bottom),
            header_height: px(self.header_height),
            header_margin_x: px(self.header_margin_x),
            header_name_px: font(self.header_name_px),
            header_date_px: font(self.header_date_px),
            header_date_right: px(self.header_date_right),
            indicator_px: font(self.indicator_px),
            indicator_right: px(self.indicator_right),
            card_top: px(self.card_top),
            card_padding: px(self.card_padding),
            card_stripe_px: px(self.card_stripe_px),
            item_title_px: font(self.item_title_px),
            item_title_line_h: px(self.item_title_line_h),
            title_body_gap: px(self.title_body_gap),
            item_body_px: font(self.item_body_px),
            item_body_line_h: px(self.item_body_line_h),
            bar_margin_x: px(self.bar_margin_x),
            bar_bottom: px(self.bar_bottom),
            bar_height: px(self.bar_height).max(1.0),
            ending_text_px: font(self.ending_text_px),
            ending_sub_px: font(self.ending_sub_px),
            ending_gap: px(self.ending_gap),
            ..self.clone()
        }
    }
}

/// Font bytes shared by every composer built from the same theme.
#[derive(Clone)]
pub struct FontBytes(pub Arc<Vec<u8>>);

impl std::fmt::Debug for FontBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBytes")
            .field("len", &self.0.len())
            .finish()
    }
}

impl PartialEq for FontBytes {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

/// Immutable visual configuration for [`FrameComposer`](crate::FrameComposer).
///
/// Without `font`, text is drawn as block glyphs sized by `metrics`. That keeps rendering
/// deterministic on machines with no fonts installed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    pub canvas: Canvas,
    pub palette: Palette,
    pub layout: ThemeLayout,
    pub metrics: MonoMetrics,
    #[serde(skip)]
    pub font: Option<FontBytes>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            palette: Palette::default(),
            layout: ThemeLayout::default(),
            metrics: MonoMetrics::default(),
            font: None,
        }
    }
}

impl Theme {
    /// Default theme proportionally scaled to `canvas` (by height).
    pub fn for_canvas(canvas: Canvas) -> Self {
        let k = f64::from(canvas.height) / DESIGN_HEIGHT;
        Self {
            canvas,
            layout: ThemeLayout::default().scaled(k),
            ..Self::default()
        }
    }

    pub fn with_font(mut self, bytes: Vec<u8>) -> Self {
        self.font = Some(FontBytes(Arc::new(bytes)));
        self
    }

    pub fn validate(&self) -> NewsreelResult<()> {
        self.canvas.validate()?;
        let l = &self.layout;
        if !(0.0..=1.0).contains(&l.card_width_frac) || !(0.0..=1.0).contains(&l.card_height_frac)
        {
            return Err(NewsreelError::validation(
                "card width/height fractions must be within [0, 1]",
            ));
        }
        if l.gradient_band_px <= 0.0 {
            return Err(NewsreelError::validation("gradient band must be > 0"));
        }
        if !l.gold_step_frac.is_finite() || l.gold_step_frac < 0.0 {
            return Err(NewsreelError::validation("gold_step_frac must be finite and >= 0"));
        }
        if l.dot_alpha.0 > l.dot_alpha.1 {
            return Err(NewsreelError::validation("dot alpha range is inverted"));
        }
        let sizes = [
            l.intro_title_px,
            l.intro_date_px,
            l.tagline_px,
            l.header_name_px,
            l.header_date_px,
            l.indicator_px,
            l.item_title_px,
            l.item_body_px,
            l.ending_text_px,
            l.ending_sub_px,
        ];
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(NewsreelError::validation("font sizes must be finite and > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/theme.rs"]
mod tests;
