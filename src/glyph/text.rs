use std::sync::Arc;

use image::RgbaImage;

use crate::{
    foundation::{
        core::{Affine, Rgba8},
        error::{CaptchaError, CaptchaResult},
    },
    glyph::fonts::{FontFace, primary_family},
    raster::stroke::{affine_to_cpu, surface_dims},
};

/// Shapes single characters with Parley and rasterizes them with
/// `vello_cpu`.
///
/// Every font file gets its own [`parley::FontContext`] holding only that
/// file, so shaping always resolves to the bytes that are later rasterized.
/// System fonts are never consulted.
pub struct TextRasterizer {
    layout_ctx: parley::LayoutContext<Rgba8>,
    registered: Vec<Registered>,
}

struct Registered {
    bytes: Arc<Vec<u8>>,
    font_ctx: parley::FontContext,
    family: String,
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer {
    pub fn new() -> Self {
        Self {
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
        }
    }

    /// Advance width and line height of `ch`, rounded up to whole pixels and
    /// never smaller than 1x1.
    pub fn measure(&mut self, ch: char, face: &FontFace) -> CaptchaResult<(u32, u32)> {
        let layout = self.layout(ch, face, Rgba8::default())?;
        Ok(layout_size(&layout))
    }

    /// Draw `ch` onto a transparent `width` x `height` surface with its layout
    /// origin at `origin`. The result is premultiplied.
    pub fn draw(
        &mut self,
        ch: char,
        face: &FontFace,
        color: Rgba8,
        (width, height): (u32, u32),
        origin: (f64, f64),
    ) -> CaptchaResult<RgbaImage> {
        let layout = self.layout(ch, face, color)?;
        let (w16, h16) = surface_dims(width, height)?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        ctx.set_transform(affine_to_cpu(Affine::translate(origin)));
        ctx.set_paint(color.to_cpu_color());

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                let baseline = run.baseline();
                let glyphs = run.glyphs().map(|g| {
                    let gx = x + g.x;
                    x += g.advance;
                    vello_cpu::Glyph {
                        id: g.id,
                        x: gx,
                        y: baseline - g.y,
                    }
                });
                ctx.glyph_run(face.cpu_font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        RgbaImage::from_raw(width, height, pixmap.data_as_u8_slice().to_vec())
            .ok_or_else(|| CaptchaError::render("glyph pixmap size mismatch"))
    }

    fn registered_index(&mut self, face: &FontFace) -> CaptchaResult<usize> {
        if let Some(idx) = self
            .registered
            .iter()
            .position(|r| Arc::ptr_eq(&r.bytes, face.bytes()))
        {
            return Ok(idx);
        }
        let mut font_ctx = parley::FontContext::default();
        let family = primary_family(&mut font_ctx, face.bytes()).ok_or_else(|| {
            CaptchaError::font(format!("font '{}' has no usable family", face.family()))
        })?;
        self.registered.push(Registered {
            bytes: Arc::clone(face.bytes()),
            font_ctx,
            family,
        });
        Ok(self.registered.len() - 1)
    }

    fn layout(
        &mut self,
        ch: char,
        face: &FontFace,
        brush: Rgba8,
    ) -> CaptchaResult<parley::Layout<Rgba8>> {
        let idx = self.registered_index(face)?;
        let Registered {
            font_ctx, family, ..
        } = &mut self.registered[idx];
        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        let mut builder = self.layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(face.size_px()));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn layout_size(layout: &parley::Layout<Rgba8>) -> (u32, u32) {
    let w = layout.full_width().ceil().max(1.0) as u32;
    let h = layout.height().ceil().max(1.0) as u32;
    (w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/text.rs"]
mod tests;
