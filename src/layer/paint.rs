//! Paint state for the avatar layers.

use std::sync::Arc;

use image::RgbaImage;
use resvg::tiny_skia::{
    FillRule, FilterQuality, Paint, Path, Pattern, Pixmap, PixmapMut, SpreadMode, Stroke,
    Transform,
};

use super::color_filter::ColorFilter;
use crate::color::Color;
use crate::geometry::{ShaderMatrix, SizePx};
use crate::raster::rgba_image_to_pixmap;

/// Something that can paint a path onto a pixmap.
pub trait Brush {
    fn draw_path(&self, canvas: &mut PixmapMut<'_>, path: &Path);
}

/// How a solid paint covers a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    /// Stroke centered on the outline.
    Stroke,
    FillAndStroke,
}

// ============================================================================
// SolidPaint
// ============================================================================

/// A single-color fill and/or stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidPaint {
    pub style: PaintStyle,
    pub color: Color,
    pub stroke_width: f32,
    pub anti_alias: bool,
}

impl SolidPaint {
    pub fn fill(color: Color) -> Self {
        Self {
            style: PaintStyle::Fill,
            color,
            stroke_width: 0.0,
            anti_alias: true,
        }
    }

    pub fn stroke(color: Color, style: PaintStyle, width: f32) -> Self {
        Self {
            style,
            color,
            stroke_width: width,
            anti_alias: true,
        }
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(self.color.to_skia());
        paint.anti_alias = self.anti_alias;
        paint
    }
}

impl Default for SolidPaint {
    fn default() -> Self {
        Self::fill(Color::TRANSPARENT)
    }
}

impl Brush for SolidPaint {
    fn draw_path(&self, canvas: &mut PixmapMut<'_>, path: &Path) {
        let paint = self.paint();

        if matches!(self.style, PaintStyle::Fill | PaintStyle::FillAndStroke) {
            canvas.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        // Zero and negative widths would fall back to hairlines.
        if matches!(self.style, PaintStyle::Stroke | PaintStyle::FillAndStroke)
            && self.stroke_width > 0.0
        {
            let stroke = Stroke {
                width: self.stroke_width,
                ..Default::default()
            };
            canvas.stroke_path(path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

// ============================================================================
// BitmapPaint
// ============================================================================

/// Paints the avatar bitmap through a pattern shader.
#[derive(Debug, Clone)]
pub struct BitmapPaint {
    source: Arc<RgbaImage>,
    pixmap: Pixmap,
    color_filter: Option<ColorFilter>,
    pub matrix: ShaderMatrix,
    pub anti_alias: bool,
    pub filter_bitmap: bool,
}

impl BitmapPaint {
    /// Builds a paint for `source`, or `None` for an empty bitmap.
    pub fn new(source: Arc<RgbaImage>, color_filter: Option<ColorFilter>) -> Option<Self> {
        let pixmap = filtered_pixmap(&source, color_filter.as_ref())?;
        Some(Self {
            source,
            pixmap,
            color_filter,
            matrix: ShaderMatrix::default(),
            anti_alias: true,
            filter_bitmap: true,
        })
    }

    pub fn source(&self) -> &Arc<RgbaImage> {
        &self.source
    }

    pub fn bitmap_size(&self) -> SizePx {
        SizePx::new(self.source.width(), self.source.height())
    }

    pub fn color_filter(&self) -> Option<&ColorFilter> {
        self.color_filter.as_ref()
    }

    /// Replaces the color filter, re-filtering the bitmap.
    pub fn set_color_filter(&mut self, color_filter: Option<ColorFilter>) {
        if let Some(pixmap) = filtered_pixmap(&self.source, color_filter.as_ref()) {
            self.pixmap = pixmap;
        }
        self.color_filter = color_filter;
    }
}

impl Brush for BitmapPaint {
    fn draw_path(&self, canvas: &mut PixmapMut<'_>, path: &Path) {
        let quality = if self.filter_bitmap {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        };

        let mut paint = Paint::default();
        paint.anti_alias = self.anti_alias;
        paint.shader = Pattern::new(
            self.pixmap.as_ref(),
            SpreadMode::Pad,
            quality,
            1.0,
            self.matrix.to_transform(),
        );

        canvas.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

fn filtered_pixmap(source: &RgbaImage, color_filter: Option<&ColorFilter>) -> Option<Pixmap> {
    match color_filter {
        Some(filter) => rgba_image_to_pixmap(&filter.apply(source)),
        None => rgba_image_to_pixmap(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use resvg::tiny_skia::{PathBuilder, Rect};

    #[test]
    fn stroke_without_width_draws_nothing() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        let path = PathBuilder::from_rect(Rect::from_ltrb(2.0, 2.0, 8.0, 8.0).unwrap());

        SolidPaint::stroke(Color::RED, PaintStyle::Stroke, 0.0)
            .draw_path(&mut pixmap.as_mut(), &path);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn fill_and_stroke_covers_outline() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        let path = PathBuilder::from_rect(Rect::from_ltrb(2.0, 2.0, 8.0, 8.0).unwrap());

        SolidPaint::stroke(Color::RED, PaintStyle::FillAndStroke, 2.0)
            .draw_path(&mut pixmap.as_mut(), &path);
        // Stroke extends one pixel outside the rect.
        assert_eq!(pixmap.pixel(1, 5).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(5, 5).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn bitmap_paint_rejects_empty_source() {
        assert!(BitmapPaint::new(Arc::new(RgbaImage::new(0, 0)), None).is_none());
    }

    #[test]
    fn color_filter_keeps_source() {
        let source = Arc::new(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
        let mut paint = BitmapPaint::new(Arc::clone(&source), None).unwrap();
        paint.set_color_filter(Some(ColorFilter::Tint(Color::BLUE)));

        assert_eq!(paint.source().get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(paint.color_filter(), Some(&ColorFilter::Tint(Color::BLUE)));
    }
}
