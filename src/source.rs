//! Image sources and their resolution to bitmaps.
//!
//! Every source the surface accepts is turned into a single [`RgbaImage`]
//! before painting. Resolution failures are returned to the caller; the
//! surface never substitutes a blank image for a source that failed.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::error::AvatarError;
use crate::raster::{rasterize_svg, render_svg};

/// Side length of the bitmap a flat color source decodes to.
pub const COLOR_DRAWABLE_DIMENSION: u32 = 2;

/// Size the built-in default avatar is rasterized at.
pub const DEFAULT_AVATAR_SIZE: u32 = 128;

const DEFAULT_AVATAR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64"><rect width="64" height="64" fill="#bdbdbd"/><circle cx="32" cy="24" r="12" fill="#f5f5f5"/><path d="M10 64c0-14 10-22 22-22s22 8 22 22z" fill="#f5f5f5"/></svg>"##;

// ============================================================================
// ResourceId
// ============================================================================

/// Identifier of an image resource owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// ============================================================================
// SvgSource
// ============================================================================

/// A source for SVG data.
///
/// - Raw SVG markup strings
/// - Emoji characters (when the `twemoji` feature is enabled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// Raw SVG markup string.
    Raw(String),

    /// An emoji character to be resolved via twemoji_assets.
    Emoji(String),
}

impl SvgSource {
    /// Creates a source from raw SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Creates a source from an emoji character.
    ///
    /// Returns `None` if the emoji is not supported by twemoji_assets.
    #[cfg(feature = "twemoji")]
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        use twemoji_assets::svg::SvgTwemojiAsset;

        SvgTwemojiAsset::from_emoji(emoji)?;
        Some(Self::Emoji(emoji.to_string()))
    }

    /// Resolves this source to SVG markup.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Raw(svg) => Some(svg.as_str()),
            #[cfg(feature = "twemoji")]
            Self::Emoji(emoji) => {
                use twemoji_assets::svg::SvgTwemojiAsset;
                let asset = SvgTwemojiAsset::from_emoji(emoji)?;
                Some(asset.as_ref())
            }
            #[cfg(not(feature = "twemoji"))]
            Self::Emoji(_) => None,
        }
    }
}

impl<S: Into<String>> From<S> for SvgSource {
    fn from(s: S) -> Self {
        Self::Raw(s.into())
    }
}

// ============================================================================
// ImageSource
// ============================================================================

/// Anything the avatar surface can paint.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An already decoded bitmap.
    Bitmap(Arc<RgbaImage>),
    /// Encoded image bytes (PNG, JPEG, ...).
    Encoded(Vec<u8>),
    /// A file on disk.
    Path(PathBuf),
    /// A resource looked up through the host.
    Resource(ResourceId),
    /// A vector drawable, rasterized at its intrinsic size.
    Vector(SvgSource),
    /// A flat color, decoded to a small square.
    Color(Color),
}

impl ImageSource {
    pub fn bitmap(image: RgbaImage) -> Self {
        Self::Bitmap(Arc::new(image))
    }

    /// Resolves this source to a bitmap.
    ///
    /// `load_resource` is consulted for [`ImageSource::Resource`]; a resource
    /// that maps to another resource is treated as missing.
    pub fn resolve<F>(&self, load_resource: F) -> Result<Arc<RgbaImage>, AvatarError>
    where
        F: FnOnce(ResourceId) -> Option<ImageSource>,
    {
        match self {
            Self::Resource(id) => match load_resource(*id) {
                Some(Self::Resource(_)) | None => Err(AvatarError::ResourceNotFound(*id)),
                Some(resolved) => resolved.resolve_direct(),
            },
            _ => self.resolve_direct(),
        }
    }

    fn resolve_direct(&self) -> Result<Arc<RgbaImage>, AvatarError> {
        let bitmap = match self {
            Self::Bitmap(image) => Arc::clone(image),
            Self::Encoded(bytes) => Arc::new(image::load_from_memory(bytes)?.to_rgba8()),
            Self::Path(path) => Arc::new(image::open(path)?.to_rgba8()),
            Self::Vector(svg) => {
                let markup = svg.resolve().ok_or_else(|| match svg {
                    SvgSource::Emoji(emoji) => AvatarError::UnresolvedEmoji(emoji.clone()),
                    SvgSource::Raw(_) => AvatarError::Svg("empty source".into()),
                })?;
                Arc::new(rasterize_svg(markup)?)
            }
            Self::Color(color) => Arc::new(RgbaImage::from_pixel(
                COLOR_DRAWABLE_DIMENSION,
                COLOR_DRAWABLE_DIMENSION,
                Rgba([color.r, color.g, color.b, color.a]),
            )),
            Self::Resource(id) => return Err(AvatarError::ResourceNotFound(*id)),
        };

        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(AvatarError::Rasterize {
                width: bitmap.width(),
                height: bitmap.height(),
            });
        }
        Ok(bitmap)
    }
}

impl From<RgbaImage> for ImageSource {
    fn from(image: RgbaImage) -> Self {
        Self::bitmap(image)
    }
}

impl From<Color> for ImageSource {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

impl From<SvgSource> for ImageSource {
    fn from(svg: SvgSource) -> Self {
        Self::Vector(svg)
    }
}

/// Rasterizes the built-in placeholder shown when no image is set.
pub fn default_avatar() -> Result<RgbaImage, AvatarError> {
    render_svg(DEFAULT_AVATAR_SVG, DEFAULT_AVATAR_SIZE)
}

// ============================================================================
// Tests
// ============================================================================
