//! Stage bounds and numeric clamping.

use kurbo::{Point, Rect, Size};

/// Smallest font size a text node may carry, in pixels.
pub const MIN_FONT_PX: f64 = 8.0;
/// Largest font size a text node may carry, in pixels.
pub const MAX_FONT_PX: f64 = 300.0;

/// Clamp `value` into `[min, max]`.
///
/// NaN is read as `0.0` before clamping, and an inverted range resolves
/// to `min` rather than panicking like `f64::clamp`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let v = if value.is_nan() { 0.0 } else { value };
    v.min(max).max(min)
}

pub fn clamp_font_px(px: f64) -> f64 {
    clamp(px, MIN_FONT_PX, MAX_FONT_PX)
}

pub fn clamp_unit(v: f64) -> f64 {
    clamp(v, 0.0, 1.0)
}

/// The bounded drawing surface hosting nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub size: Size,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Stage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width.max(0.0), height.max(0.0)),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }

    /// Clamp a box origin so a box of `size` stays on stage.
    /// A box larger than the stage pins to the top-left edge.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        let max_x = (self.size.width - size.width).max(0.0);
        let max_y = (self.size.height - size.height).max(0.0);
        Point::new(clamp(origin.x, 0.0, max_x), clamp(origin.y, 0.0, max_y))
    }

    /// Clamp a pointer position onto the stage surface.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            clamp(p.x, 0.0, self.size.width),
            clamp(p.y, 0.0, self.size.height),
        )
    }

    /// A point at a fraction of the stage extent, e.g. `(0.1, 0.1)`.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.size.width * fx, self.size.height * fy)
    }
}
