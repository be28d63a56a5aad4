//! circle-avatar: circular and rectangular avatar rendering
//!
//! This crate renders a profile picture with an optional circular mask, a
//! colored border and a background fill. The image can come from a bitmap,
//! encoded bytes, a file, an SVG or a flat color, or be replaced with an
//! initials placeholder.
//!
//! # Example
//!
//! ```
//! use circle_avatar::{AvatarView, Color, DetachedHost, ImageSource};
//!
//! let mut view = AvatarView::new(DetachedHost).unwrap();
//! view.set_circular_mask(true);
//! view.set_border_width(10);
//! view.set_border_color(Color::WHITE);
//! view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
//!
//! // Geometry is computed once the host assigns a size
//! view.on_size_changed(200, 200);
//! let geometry = view.geometry().unwrap();
//! assert_eq!(geometry.border_radius, 95.0);
//!
//! let frame = view.render().unwrap();
//! assert_eq!(frame.dimensions(), (200, 200));
//! ```
//!
//! # Initials
//!
//! ```
//! use circle_avatar::{AvatarView, DetachedHost};
//!
//! let mut view = AvatarView::new(DetachedHost).unwrap();
//! view.on_size_changed(96, 96);
//! view.set_initials("jd");
//! view.set_use_initials(true);
//! assert_eq!(view.bitmap().dimensions(), (88, 88));
//! ```
//!
//! # Serializable Profiles
//!
//! [`AvatarProfile`] stores the configuration as JSON and is applied through
//! the [`Configurable`] trait:
//!
//! ```
//! use circle_avatar::{AvatarProfile, AvatarView, Configurable, DetachedHost};
//!
//! let mut view = AvatarView::new(DetachedHost).unwrap();
//! let profile = AvatarProfile::from_json(r#"{"borderWidth":2,"circularMask":true}"#).unwrap();
//! view.apply_profile(&profile);
//!
//! let json = view.export_profile().to_json().unwrap();
//! assert!(json.contains(r#""circularMask":true"#));
//! ```

mod color;
mod error;
mod geometry;
mod initials;
mod layer;
mod profile;
mod raster;
mod source;
mod view;

pub use color::{Color, ParseColorError};
pub use error::AvatarError;
pub use geometry::{Geometry, Padding, RectF, ShaderMatrix, SizePx};
pub use initials::{InitialsBuilder, InitialsConfig, InitialsRenderer, InitialsShape, Typeface};
pub use layer::{BitmapPaint, Brush, ColorFilter, LayerStack, PaintStyle, SolidPaint};
pub use profile::{AvatarProfile, FontSettings};
pub use raster::{pixmap_to_rgba_image, rasterize_svg, render_svg, rgba_image_to_pixmap};
pub use source::{
    COLOR_DRAWABLE_DIMENSION, DEFAULT_AVATAR_SIZE, ImageSource, ResourceId, SvgSource,
    default_avatar,
};
pub use view::{
    AvatarView, Configurable, DEFAULT_BACKGROUND_COLOR, DEFAULT_BORDER_COLOR,
    DEFAULT_BORDER_OVERLAY, DEFAULT_BORDER_WIDTH, DEFAULT_FONT_SCALE, DEFAULT_FONT_SIZE,
    DEFAULT_INITIALS, DEFAULT_TEXT_COLOR, DetachedHost, LayoutDirection, Lifecycle, RenderConfig,
    SCALE_TYPE, ScaleType, TouchAction, TouchEvent, ViewHost,
};
