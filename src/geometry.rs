//! Layout geometry for the avatar surface.
//!
//! All rectangles are computed in surface pixel coordinates. The border,
//! background and drawable rectangles are concentric squares derived from the
//! surface size, its padding and the border width.

use resvg::tiny_skia;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Padding on each edge of the surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Padding {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same padding on all four edges.
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// A rectangle with floating point edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    /// Returns true if the rectangle has no positive area.
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Moves every edge inwards by `dx` horizontally and `dy` vertically.
    ///
    /// Negative values grow the rectangle. Insetting past the center leaves an
    /// inverted (empty) rectangle.
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right - dx,
            bottom: self.bottom - dy,
        }
    }

    /// Converts to a tiny-skia rectangle, or `None` if empty.
    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        if self.is_empty() {
            return None;
        }
        tiny_skia::Rect::from_ltrb(self.left, self.top, self.right, self.bottom)
    }
}

/// Scale and translation that maps a source bitmap onto the drawable rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderMatrix {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ShaderMatrix {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ShaderMatrix {
    /// Computes a cover fit of a `bitmap`-sized image into `dst`.
    ///
    /// The bitmap is scaled uniformly until it covers `dst`; the overflowing
    /// axis is centered. Offsets are rounded to whole pixels.
    pub fn cover(bitmap: SizePx, dst: &RectF) -> Self {
        if bitmap.is_empty() {
            return Self::default();
        }

        let bw = bitmap.width as f32;
        let bh = bitmap.height as f32;
        let mut dx = 0.0;
        let mut dy = 0.0;

        let scale = if bw * dst.height() > dst.width() * bh {
            let scale = dst.height() / bh;
            dx = (dst.width() - bw * scale) * 0.5;
            scale
        } else {
            let scale = dst.width() / bw;
            dy = (dst.height() - bh * scale) * 0.5;
            scale
        };

        Self {
            scale,
            translate_x: (dx + 0.5).trunc() + dst.left,
            translate_y: (dy + 0.5).trunc() + dst.top,
        }
    }

    /// Maps a point in bitmap space to surface space.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    pub(crate) fn to_transform(self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_scale(self.scale, self.scale)
            .post_translate(self.translate_x, self.translate_y)
    }
}

/// Derived layout of the three avatar layers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Largest centered square inside the padded surface.
    pub border_rect: RectF,
    /// Border rect inset by the full border width.
    pub background_rect: RectF,
    /// Area the source bitmap is painted into.
    pub drawable_rect: RectF,
    pub border_radius: f32,
    pub drawable_radius: f32,
}

impl Geometry {
    /// Returns the largest square centered in the padded surface, or `None`
    /// when no area is left after padding.
    pub fn outer_bounds(size: SizePx, padding: Padding) -> Option<RectF> {
        let available_width = size.width as i64 - padding.left as i64 - padding.right as i64;
        let available_height = size.height as i64 - padding.top as i64 - padding.bottom as i64;
        if available_width <= 0 || available_height <= 0 {
            return None;
        }

        let side = available_width.min(available_height);
        let left = padding.left as f32 + (available_width - side) as f32 / 2.0;
        let top = padding.top as f32 + (available_height - side) as f32 / 2.0;
        let side = side as f32;

        Some(RectF::from_ltrb(left, top, left + side, top + side))
    }

    /// Computes every rectangle and radius for the given layout inputs.
    pub fn compute(
        size: SizePx,
        padding: Padding,
        border_width: i32,
        border_overlay: bool,
    ) -> Option<Self> {
        let border_rect = Self::outer_bounds(size, padding)?;
        let width = border_width as f32;

        let background_rect = border_rect.inset(width, width);
        let border_radius =
            ((border_rect.height().min(border_rect.width()) - width) / 2.0).max(0.0);

        // The image overlaps the inner pixel of the ring.
        let drawable_rect = if !border_overlay && border_width > 0 {
            border_rect.inset(width - 1.0, width - 1.0)
        } else {
            border_rect
        };
        let drawable_radius = (drawable_rect.height().min(drawable_rect.width()) / 2.0).max(0.0);

        Some(Self {
            border_rect,
            background_rect,
            drawable_rect,
            border_radius,
            drawable_radius,
        })
    }

    /// Returns true if `(x, y)` lies within the border circle.
    ///
    /// An empty border rect accepts every point.
    pub fn in_touchable_area(&self, x: f32, y: f32) -> bool {
        if self.border_rect.is_empty() {
            return true;
        }

        let dx = (x - self.border_rect.center_x()) as f64;
        let dy = (y - self.border_rect.center_y()) as f64;
        let radius = self.border_radius as f64;
        dx * dx + dy * dy <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: u32, border: i32, overlay: bool) -> Geometry {
        Geometry::compute(SizePx::new(size, size), Padding::default(), border, overlay).unwrap()
    }

    #[test]
    fn reference_layout() {
        let g = square(200, 10, false);
        assert_eq!(g.border_rect, RectF::from_ltrb(0.0, 0.0, 200.0, 200.0));
        assert_eq!(g.background_rect, RectF::from_ltrb(10.0, 10.0, 190.0, 190.0));
        assert_eq!(g.drawable_rect, RectF::from_ltrb(9.0, 9.0, 191.0, 191.0));
        assert_eq!(g.border_radius, 95.0);
        assert_eq!(g.drawable_radius, 91.0);
    }

    #[test]
    fn overlay_and_zero_width_keep_drawable_on_border() {
        for (width, overlay) in [(10, true), (0, false), (0, true)] {
            let g = square(120, width, overlay);
            assert_eq!(g.drawable_rect, g.border_rect, "width {width} overlay {overlay}");
        }
    }

    #[test]
    fn insets_hold_for_many_widths() {
        for width in [0, 1, 2, 5, 17, 40] {
            for (w, h) in [(100, 100), (300, 120), (64, 200)] {
                let g = Geometry::compute(SizePx::new(w, h), Padding::default(), width, false)
                    .unwrap();
                let wf = width as f32;
                assert_eq!(g.background_rect, g.border_rect.inset(wf, wf));
                if width == 0 {
                    assert_eq!(g.drawable_rect, g.border_rect);
                } else {
                    assert_eq!(g.drawable_rect, g.border_rect.inset(wf - 1.0, wf - 1.0));
                }
                assert_eq!(g.border_rect.width(), g.border_rect.height());
                assert_eq!(g.border_rect.width(), w.min(h) as f32);
            }
        }
    }

    #[test]
    fn radius_never_negative() {
        let g = square(50, 80, false);
        assert_eq!(g.border_radius, 0.0);
        assert_eq!(g.drawable_radius, 0.0);
        assert!(g.background_rect.is_empty());
    }

    #[test]
    fn padding_centers_the_square() {
        let g = Geometry::compute(SizePx::new(300, 200), Padding::new(10, 20, 30, 40), 0, false)
            .unwrap();
        // available 260x140, side 140, horizontal slack 120
        assert_eq!(g.border_rect, RectF::from_ltrb(70.0, 20.0, 210.0, 160.0));
    }

    #[test]
    fn no_area_after_padding() {
        assert!(Geometry::outer_bounds(SizePx::new(20, 20), Padding::uniform(10)).is_none());
        assert!(Geometry::outer_bounds(SizePx::new(0, 50), Padding::default()).is_none());
    }

    #[test]
    fn cover_fit_wide_bitmap() {
        let dst = RectF::from_ltrb(0.0, 0.0, 100.0, 100.0);
        let m = ShaderMatrix::cover(SizePx::new(200, 100), &dst);
        assert_eq!(m.scale, 1.0);
        // (100 - 200) / 2 = -50, rounded via +0.5 then truncation
        assert_eq!(m.translate_x, -49.0);
        assert_eq!(m.translate_y, 0.0);
    }

    #[test]
    fn cover_fit_tall_bitmap_is_offset_by_drawable_origin() {
        let dst = RectF::from_ltrb(9.0, 9.0, 191.0, 191.0);
        let m = ShaderMatrix::cover(SizePx::new(91, 182), &dst);
        assert_eq!(m.scale, 2.0);
        assert_eq!(m.translate_x, 9.0);
        let (_, top) = m.map_point(0.0, 0.0);
        assert!(top < dst.top);
    }

    #[test]
    fn hit_test_circle() {
        let g = square(200, 10, false);
        assert!(g.in_touchable_area(100.0, 100.0));
        assert!(g.in_touchable_area(100.0 + 95.0, 100.0));
        assert!(!g.in_touchable_area(100.0 + 95.5, 100.0));
        assert!(!g.in_touchable_area(1.0, 1.0));
    }
}
