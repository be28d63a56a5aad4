//! SVG rasterization and pixel buffer conversions using resvg/tiny-skia.
//!
//! Vector sources, the default avatar asset and generated initials all pass
//! through here on their way to an [`RgbaImage`].

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};

use crate::error::AvatarError;

// ============================================================================
// Fonts
// ============================================================================

/// Returns the process-wide font database, loading system fonts on first use.
pub(crate) fn font_database() -> Arc<fontdb::Database> {
    static FONT_DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

    FONT_DB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();

            // The generic sans-serif family defaults to Arial, which most
            // Linux systems lack.
            let sans = db
                .faces()
                .flat_map(|face| face.families.iter())
                .map(|(name, _)| name)
                .find(|name| name.contains("Sans"))
                .cloned();
            if let Some(family) = sans {
                db.set_sans_serif_family(family);
            }

            log::debug!("loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

fn svg_options() -> Options<'static> {
    let mut opts = Options::default();
    opts.fontdb = font_database();
    opts
}

pub(crate) fn parse_svg(svg_data: &str) -> Result<Tree, AvatarError> {
    Tree::from_str(svg_data, &svg_options()).map_err(|e| AvatarError::Svg(e.to_string()))
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Rasterizes an SVG document at its intrinsic size.
pub fn rasterize_svg(svg_data: &str) -> Result<RgbaImage, AvatarError> {
    let tree = parse_svg(svg_data)?;
    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or(AvatarError::Rasterize { width, height })?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Renders an SVG string to an RGBA image at the specified size.
///
/// The SVG is scaled to fit within `size x size` pixels while preserving
/// aspect ratio (the larger dimension will be `size`).
pub fn render_svg(svg_data: &str, size: u32) -> Result<RgbaImage, AvatarError> {
    let tree = parse_svg(svg_data)?;

    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or(AvatarError::Rasterize { width, height })?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

// ============================================================================
// Conversions
// ============================================================================

/// Converts a premultiplied tiny-skia pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    img
}

/// Converts a straight-alpha image to a premultiplied pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Some(pixmap)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="60"><rect width="100" height="60" fill="#ff0000"/></svg>"##;

    #[test]
    fn rasterize_uses_intrinsic_size() {
        let img = rasterize_svg(SIMPLE_SVG).unwrap();
        assert_eq!((img.width(), img.height()), (100, 60));
        assert_eq!(img.get_pixel(50, 30).0, [255, 0, 0, 255]);
    }

    #[test]
    fn render_fits_larger_dimension() {
        let img = render_svg(SIMPLE_SVG, 50).unwrap();
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), 30);
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(matches!(rasterize_svg("not svg"), Err(AvatarError::Svg(_))));
    }

    #[test]
    fn pixmap_conversion_preserves_straight_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0]));

        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let back = pixmap_to_rgba_image(&pixmap);
        assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
        // Fully transparent pixels lose their color when premultiplied.
        assert_eq!(back.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn empty_image_has_no_pixmap() {
        assert!(rgba_image_to_pixmap(&RgbaImage::new(0, 4)).is_none());
    }
}
