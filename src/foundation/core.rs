pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color. Also the Parley brush type.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const RED: Self = Self::opaque(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    pub fn to_cpu_color(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Location of one laid-out character in canvas pixel coordinates.
///
/// `x` and `width` may be fractional once the canvas has been scaled back to
/// its configured width; `y` and `height` stay on the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub ch: char,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(ch: char, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            ch,
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    /// Scale the horizontal extent by `ratio` and keep the right edge inside
    /// `max_width`.
    pub fn rescaled_x(self, ratio: f64, max_width: f64) -> Self {
        let x = (self.x * ratio).clamp(0.0, max_width);
        let width = (self.width * ratio).min(max_width - x).max(0.0);
        Self { x, width, ..self }
    }

    /// Clip the box to a `width` x `height` canvas.
    pub fn clipped(self, width: f64, height: f64) -> Self {
        let x = self.x.clamp(0.0, width);
        let y = self.y.clamp(0.0, height);
        Self {
            x,
            y,
            width: (self.right().min(width) - x).max(0.0),
            height: (self.bottom().min(height) - y).max(0.0),
            ..self
        }
    }
}
