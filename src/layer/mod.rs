//! The three paint layers of an avatar and how they are drawn.
//!
//! Layers are painted back to front:
//!
//! ```text
//! ┌────────────┐
//! │   Border   │ ◄── ring in the border color
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │ Background │ ◄── solid fill behind transparent bitmap pixels
//! └─────┬──────┘
//!       ▼
//! ┌────────────┐
//! │   Bitmap   │ ◄── source image through a cover-fit shader
//! └────────────┘
//! ```
//!
//! With the circular mask each layer is a disc, otherwise a rectangle.

pub mod color_filter;
pub mod paint;

pub use color_filter::ColorFilter;
pub use paint::{BitmapPaint, Brush, PaintStyle, SolidPaint};

use resvg::tiny_skia::{Path, PathBuilder, PixmapMut};

use crate::geometry::{Geometry, RectF};

/// Paint state for every layer.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    pub border: SolidPaint,
    pub background: SolidPaint,
    pub bitmap: Option<BitmapPaint>,
}

impl LayerStack {
    /// Draws all layers for `geometry` onto `canvas`.
    pub fn draw(&self, canvas: &mut PixmapMut<'_>, geometry: &Geometry, circular: bool) {
        if circular {
            self.draw_circular(canvas, geometry);
        } else {
            self.draw_rectangular(canvas, geometry);
        }
    }

    fn draw_circular(&self, canvas: &mut PixmapMut<'_>, geometry: &Geometry) {
        let border = &geometry.border_rect;
        let drawable = &geometry.drawable_rect;

        if !border.is_empty() {
            if let Some(path) = circle(border, geometry.border_radius) {
                self.border.draw_path(canvas, &path);
            }
        }

        let Some(disc) = circle(drawable, geometry.drawable_radius) else {
            return;
        };
        self.background.draw_path(canvas, &disc);
        if let Some(bitmap) = &self.bitmap {
            bitmap.draw_path(canvas, &disc);
        }
    }

    fn draw_rectangular(&self, canvas: &mut PixmapMut<'_>, geometry: &Geometry) {
        if let Some(path) = rect(&geometry.border_rect) {
            self.border.draw_path(canvas, &path);
        }
        if let Some(path) = rect(&geometry.background_rect) {
            self.background.draw_path(canvas, &path);
        }
        if let (Some(bitmap), Some(path)) = (&self.bitmap, rect(&geometry.drawable_rect)) {
            bitmap.draw_path(canvas, &path);
        }
    }
}

fn circle(bounds: &RectF, radius: f32) -> Option<Path> {
    if radius <= 0.0 {
        return None;
    }
    PathBuilder::from_circle(bounds.center_x(), bounds.center_y(), radius)
}

fn rect(bounds: &RectF) -> Option<Path> {
    bounds.to_skia().map(PathBuilder::from_rect)
}
