use crate::foundation::core::Rgba8;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::layout::wrap::{
    FontMetrics, MonoMetrics, check_sizes, clamp_lines_by, wrap_by, wrap_clamped,
};
use crate::render::theme::Theme;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Draws single, already-wrapped lines of text into a `vello_cpu` context.
///
/// With font bytes the line is shaped by Parley and filled as glyph outlines; without, each
/// visible glyph becomes a filled box whose advance comes from the theme metrics.
pub struct TextPainter {
    metrics: MonoMetrics,
    shaper: Option<Shaper>,
}

struct Shaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextPainter {
    pub fn new(theme: &Theme) -> NewsreelResult<Self> {
        let shaper = match &theme.font {
            Some(bytes) => Some(Shaper::new(bytes.0.as_slice())?),
            None => None,
        };
        Ok(Self {
            metrics: theme.metrics,
            shaper,
        })
    }

    /// Rendered width of `text` at `size_px`.
    pub fn line_width(&mut self, text: &str, size_px: f32) -> f32 {
        match self.shaper.as_mut() {
            Some(shaper) => shaper.layout(text, size_px, Rgba8::WHITE).width(),
            None => crate::layout::wrap::measure(text, &self.metrics, size_px),
        }
    }

    /// Wrap and clamp `text` to `max_width`, measured the same way [`draw_line`](Self::draw_line)
    /// will draw it: shaped widths with a font, theme metrics for block glyphs.
    pub fn wrap_clamped(
        &mut self,
        text: &str,
        max_width: f32,
        size_px: f32,
        max_lines: usize,
    ) -> NewsreelResult<Vec<String>> {
        match self.shaper.as_mut() {
            Some(shaper) => {
                check_sizes(max_width, size_px)?;
                let mut width = |line: &str| shaper.layout(line, size_px, Rgba8::WHITE).width();
                let lines = wrap_by(text, max_width, &mut width);
                Ok(clamp_lines_by(&lines, max_lines, max_width, &mut width))
            }
            None => wrap_clamped(text, max_width, &self.metrics, size_px, max_lines),
        }
    }

    /// Draw `text` with its top-left corner at `(x, y_top)`.
    pub fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        x: f64,
        y_top: f64,
        size_px: f32,
        color: Rgba8,
    ) {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(cpu_color(color));
        match self.shaper.as_mut() {
            Some(shaper) => shaper.draw(ctx, text, x, y_top, size_px, color),
            None => draw_block_glyphs(ctx, &self.metrics, text, x, y_top, size_px),
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

impl Shaper {
    fn new(font_bytes: &[u8]) -> NewsreelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            NewsreelError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NewsreelError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color.into()));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        x: f64,
        y_top: f64,
        size_px: f32,
        color: Rgba8,
    ) {
        let layout = self.layout(text, size_px, color);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y_top)));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

fn draw_block_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    metrics: &MonoMetrics,
    text: &str,
    x: f64,
    y_top: f64,
    size_px: f32,
) {
    let size = f64::from(size_px);
    let mut pen = x;
    for ch in text.chars() {
        let advance = f64::from(metrics.advance_em(ch)) * size;
        if !ch.is_whitespace() {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                pen + advance * 0.1,
                y_top + size * 0.2,
                pen + advance * 0.9,
                y_top + size * 0.9,
            ));
        }
        pen += advance;
    }
}

pub(crate) fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
