use image::RgbImage;
use kurbo::{BezPath, PathEl, Shape};

use crate::{
    foundation::{
        core::{Affine, Point, Rgba8},
        error::{CaptchaError, CaptchaResult},
    },
    raster::composite::{composite_layer, composite_layer_at},
};

const PATH_TOLERANCE: f64 = 0.1;

/// Transparent vector layer the size of a canvas. Strokes accumulate in a
/// `vello_cpu` context and land on the canvas in one composite.
pub struct StrokeLayer {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl StrokeLayer {
    pub fn new(width: u32, height: u32) -> CaptchaResult<Self> {
        let (width, height) = surface_dims(width, height)?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    pub fn for_canvas(canvas: &RgbImage) -> CaptchaResult<Self> {
        Self::new(canvas.width(), canvas.height())
    }

    /// Stroke any `kurbo` shape with a `line_width` pixel pen.
    pub fn stroke_shape(&mut self, shape: &impl Shape, line_width: f64, color: Rgba8) {
        let path = shape.to_path(PATH_TOLERANCE);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu_color());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(line_width));
        self.ctx.stroke_path(&bezpath_to_cpu(&path));
    }

    /// Straight segment between two points.
    pub fn stroke_line(&mut self, from: Point, to: Point, line_width: f64, color: Rgba8) {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        self.stroke_shape(&path, line_width, color);
    }

    /// Rasterize everything stroked so far into premultiplied RGBA8 bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }

    /// Rasterize and composite onto `canvas`, which must match the layer size.
    pub fn composite_onto(self, canvas: &mut RgbImage) -> CaptchaResult<()> {
        let layer = self.finish();
        composite_layer(canvas, &layer)
    }

    /// Rasterize and composite with the layer's upper-left corner at
    /// `origin` on `canvas`. The layer may be smaller than the canvas.
    pub fn composite_onto_at(
        self,
        canvas: &mut RgbImage,
        origin: (i64, i64),
    ) -> CaptchaResult<()> {
        let size = (u32::from(self.width), u32::from(self.height));
        let layer = self.finish();
        composite_layer_at(canvas, &layer, size, origin)
    }
}

pub(crate) fn surface_dims(width: u32, height: u32) -> CaptchaResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CaptchaError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CaptchaError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(CaptchaError::render("surface must be at least 1x1"));
    }
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
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
#[path = "../../tests/unit/raster/stroke.rs"]
mod tests;
