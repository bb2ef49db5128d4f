use std::sync::Arc;

use kurbo::{BezPath, Circle, Point, Shape, Vec2};
use rand::{Rng, SeedableRng};

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::render::frame::RenderedFrame;
use crate::render::text::{TextPainter, cpu_color};
use crate::render::theme::Theme;
use crate::script::{SceneDescriptor, SceneKind};

const DOT_PATH_TOLERANCE: f64 = 0.1;

/// Rasterizes [`SceneDescriptor`]s with one immutable [`Theme`].
///
/// A composer owns its text shaping state, so parallel rendering uses one composer per worker.
/// The dot texture is generated once from `theme.layout.dot_seed`, which makes every frame from
/// the same theme share it.
pub struct FrameComposer {
    theme: Arc<Theme>,
    text: TextPainter,
    width: u16,
    height: u16,
    dots: Vec<Dot>,
}

#[derive(Clone, Copy, Debug)]
struct Dot {
    center: Point,
    radius: f64,
    alpha: u8,
}

impl FrameComposer {
    pub fn new(theme: Arc<Theme>) -> NewsreelResult<Self> {
        theme.validate()?;
        let width: u16 = theme
            .canvas
            .width
            .try_into()
            .map_err(|_| NewsreelError::validation("canvas width exceeds u16"))?;
        let height: u16 = theme
            .canvas
            .height
            .try_into()
            .map_err(|_| NewsreelError::validation("canvas height exceeds u16"))?;
        let text = TextPainter::new(&theme)?;
        let dots = scatter_dots(&theme);
        Ok(Self {
            theme,
            text,
            width,
            height,
            dots,
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render one scene into premultiplied RGBA8 pixels.
    pub fn render(&mut self, scene: &SceneDescriptor) -> NewsreelResult<RenderedFrame> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.draw_background(&mut ctx);

        match &scene.kind {
            SceneKind::Intro {
                title,
                date,
                tagline,
            } => self.draw_intro(&mut ctx, title, date, tagline),
            SceneKind::Item {
                header,
                date,
                title,
                body,
                position,
                total,
            } => self.draw_item(&mut ctx, header, date, title, body, *position, *total)?,
            SceneKind::Ending { text, subtext } => self.draw_ending(&mut ctx, text, subtext),
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(RenderedFrame {
            scene_index: scene.index,
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn size(&self) -> Vec2 {
        self.theme.canvas.size()
    }

    fn draw_background(&self, ctx: &mut vello_cpu::RenderContext) {
        let palette = &self.theme.palette;
        let layout = &self.theme.layout;
        let size = self.size();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let band = layout.gradient_band_px;
        let mut y = 0.0;
        while y < size.y {
            let t = if size.y > 1.0 { y / (size.y - 1.0) } else { 0.0 };
            let color = palette.background_top.lerp(palette.background_bottom, t);
            ctx.set_paint(cpu_color(color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                y,
                size.x,
                (y + band).min(size.y),
            ));
            y += band;
        }

        let origin = Point::new(
            layout.ray_origin.0 * size.x,
            layout.ray_origin.1 * size.y,
        );
        ctx.set_paint(cpu_color(palette.ray));
        for i in 0..layout.ray_count {
            let angle = f64::from(i) * std::f64::consts::TAU / f64::from(layout.ray_count);
            let ray = ray_quad(
                origin,
                angle,
                layout.ray_inner_px,
                layout.ray_outer_px,
                layout.ray_width_px,
            );
            ctx.fill_path(&bezpath_to_cpu(&ray));
        }

        for dot in &self.dots {
            ctx.set_paint(cpu_color(palette.dot.with_alpha(dot.alpha)));
            let circle = Circle::new(dot.center, dot.radius).to_path(DOT_PATH_TOLERANCE);
            ctx.fill_path(&bezpath_to_cpu(&circle));
        }
    }

    fn draw_intro(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        title: &str,
        date: &str,
        tagline: &str,
    ) {
        let theme = Arc::clone(&self.theme);
        let (palette, layout) = (&theme.palette, &theme.layout);
        let size = self.size();

        let title_y = layout.intro_title_y;
        let title_x = self.centered_x(title, layout.intro_title_px);
        for layer in (1..=layout.depth_layers).rev() {
            let offset = f64::from(layer) * layout.depth_step_px;
            self.text.draw_line(
                ctx,
                title,
                title_x + offset,
                title_y + offset,
                layout.intro_title_px,
                palette.depth,
            );
        }
        self.text.draw_line(
            ctx,
            title,
            title_x,
            title_y,
            layout.intro_title_px,
            palette.text,
        );

        let date_y = title_y + layout.intro_date_gap;
        let date_x = self.centered_x(date, layout.intro_date_px);
        let shadow = layout.intro_date_shadow_px;
        self.text.draw_line(
            ctx,
            date,
            date_x + shadow,
            date_y + shadow,
            layout.intro_date_px,
            palette.accent_shadow,
        );
        self.text
            .draw_line(ctx, date, date_x, date_y, layout.intro_date_px, palette.accent);

        let tagline_y = size.y - layout.tagline_bottom;
        self.draw_gold_centered(ctx, tagline, tagline_y, layout.tagline_px);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_item(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        header: &str,
        date: &str,
        title: &str,
        body: &str,
        position: usize,
        total: usize,
    ) -> NewsreelResult<()> {
        let theme = Arc::clone(&self.theme);
        let (palette, layout) = (&theme.palette, &theme.layout);
        let size = self.size();

        ctx.set_paint(cpu_color(palette.header_fill));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            size.x,
            layout.header_height,
        ));
        self.text.draw_line(
            ctx,
            header,
            layout.header_margin_x,
            (layout.header_height - f64::from(layout.header_name_px)) / 2.0,
            layout.header_name_px,
            palette.text,
        );
        self.text.draw_line(
            ctx,
            date,
            size.x - layout.header_date_right,
            (layout.header_height - f64::from(layout.header_date_px)) / 2.0,
            layout.header_date_px,
            palette.muted,
        );

        let card_w = size.x * layout.card_width_frac;
        let card_h = size.y * layout.card_height_frac;
        let card_x = (size.x - card_w) / 2.0;
        let card_y = layout.card_top;
        ctx.set_paint(cpu_color(palette.card_fill));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            card_x,
            card_y,
            card_x + card_w,
            card_y + card_h,
        ));
        ctx.set_paint(cpu_color(palette.accent));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            card_x,
            card_y,
            card_x + layout.card_stripe_px,
            card_y + card_h,
        ));

        let text_x = card_x + layout.card_padding;
        let text_w = card_text_width(&theme);

        let mut y = card_y + layout.card_padding;
        let title_lines = self.text.wrap_clamped(
            title,
            text_w,
            layout.item_title_px,
            layout.item_title_max_lines,
        )?;
        for line in &title_lines {
            self.text
                .draw_line(ctx, line, text_x, y, layout.item_title_px, palette.gold);
            y += layout.item_title_line_h;
        }

        y += layout.title_body_gap;
        let body_lines = self.text.wrap_clamped(
            body,
            text_w,
            layout.item_body_px,
            layout.item_body_max_lines,
        )?;
        for line in &body_lines {
            self.text
                .draw_line(ctx, line, text_x, y, layout.item_body_px, palette.body);
            y += layout.item_body_line_h;
        }

        let bar_x0 = layout.bar_margin_x;
        let bar_x1 = (size.x - layout.bar_margin_x).max(bar_x0);
        let bar_y = size.y - layout.bar_bottom;
        ctx.set_paint(cpu_color(palette.bar_track));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            bar_x0,
            bar_y,
            bar_x1,
            bar_y + layout.bar_height,
        ));
        let progress = progress_fraction(position, total);
        if progress > 0.0 {
            ctx.set_paint(cpu_color(palette.accent));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                bar_x0,
                bar_y,
                bar_x0 + (bar_x1 - bar_x0) * progress,
                bar_y + layout.bar_height,
            ));
        }

        let indicator = format!("{position} / {total}");
        let indicator_y = bar_y - 2.0 * f64::from(layout.indicator_px);
        let indicator_x = self.indicator_x(&indicator);
        self.text.draw_line(
            ctx,
            &indicator,
            indicator_x,
            indicator_y,
            layout.indicator_px,
            palette.muted,
        );
        Ok(())
    }

    fn draw_ending(&mut self, ctx: &mut vello_cpu::RenderContext, text: &str, subtext: &str) {
        let theme = Arc::clone(&self.theme);
        let (palette, layout) = (&theme.palette, &theme.layout);
        let size = self.size();

        let block_h = f64::from(layout.ending_text_px) + layout.ending_gap;
        let text_y = (size.y - block_h) / 2.0;
        self.draw_gold_centered(ctx, text, text_y, layout.ending_text_px);

        let sub_y = text_y + layout.ending_gap;
        let sub_x = self.centered_x(subtext, layout.ending_sub_px);
        self.text
            .draw_line(ctx, subtext, sub_x, sub_y, layout.ending_sub_px, palette.subtext);
    }

    /// Shadow, face, then a translucent highlight nudged up and left.
    fn draw_gold_centered(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        y: f64,
        size_px: f32,
    ) {
        let theme = Arc::clone(&self.theme);
        let palette = &theme.palette;
        let x = self.centered_x(text, size_px);
        let step = (f64::from(size_px) * theme.layout.gold_step_frac).max(1.0);
        for layer in (1..=2).rev() {
            let offset = f64::from(layer) * step;
            self.text
                .draw_line(ctx, text, x + offset, y + offset, size_px, palette.gold_shadow);
        }
        self.text.draw_line(ctx, text, x, y, size_px, palette.gold);
        self.text.draw_line(
            ctx,
            text,
            x - step * 0.5,
            y - step * 0.5,
            size_px,
            palette.gold_highlight,
        );
    }

    /// Left edge that puts the end of the `k / n` indicator `indicator_right` from the frame edge.
    fn indicator_x(&mut self, indicator: &str) -> f64 {
        let layout = &self.theme.layout;
        let (right, size_px) = (layout.indicator_right, layout.indicator_px);
        let width = f64::from(self.text.line_width(indicator, size_px));
        (self.size().x - right - width).max(0.0)
    }

    fn centered_x(&mut self, text: &str, size_px: f32) -> f64 {
        let width = f64::from(self.text.line_width(text, size_px));
        ((self.size().x - width) / 2.0).max(0.0)
    }
}

/// Width available to item title and body lines inside the card.
pub fn card_text_width(theme: &Theme) -> f32 {
    let card_w = theme.canvas.size().x * theme.layout.card_width_frac;
    (card_w - 2.0 * theme.layout.card_padding).max(1.0) as f32
}

/// Fraction of the progress bar filled for item `position` of `total` (1-based).
pub fn progress_fraction(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (position.min(total) as f64) / (total as f64)
}

fn scatter_dots(theme: &Theme) -> Vec<Dot> {
    let layout = &theme.layout;
    let size = theme.canvas.size();
    let mut rng = rand::rngs::StdRng::seed_from_u64(layout.dot_seed);
    let (alpha_lo, alpha_hi) = layout.dot_alpha;
    (0..layout.dot_count)
        .map(|_| Dot {
            center: Point::new(rng.r#gen::<f64>() * size.x, rng.r#gen::<f64>() * size.y),
            radius: 1.0 + rng.r#gen::<f64>() * (layout.dot_max_px - 1.0).max(0.0),
            alpha: rng.gen_range(alpha_lo..=alpha_hi),
        })
        .collect()
}

/// Thin quad from `inner` to `outer` pixels out of `origin` along `angle`.
fn ray_quad(origin: Point, angle: f64, inner: f64, outer: f64, width: f64) -> BezPath {
    let dir = Vec2::new(angle.cos(), angle.sin());
    let normal = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let near = origin + dir * inner;
    let far = origin + dir * outer;

    let mut path = BezPath::new();
    path.move_to(near + normal);
    path.line_to(far + normal);
    path.line_to(far - normal);
    path.line_to(near - normal);
    path.close_path();
    path
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
