//! Serializable avatar profile.
//!
//! An [`AvatarProfile`] captures every user-settable avatar property in a
//! form that round-trips through JSON, so a configuration can be stored or
//! sent to another process and applied with
//! [`Configurable::apply_profile`](crate::Configurable::apply_profile).
//!
//! # Example
//!
//! ```
//! use circle_avatar::{AvatarProfile, Color, ColorFilter};
//!
//! let profile = AvatarProfile {
//!     border_width: 8,
//!     circular_mask: true,
//!     border_color: Color::from_rgb8(0x33, 0x66, 0x99),
//!     color_filter: Some(ColorFilter::Saturation(0.0)),
//!     ..AvatarProfile::default()
//! };
//!
//! let json = profile.to_json().unwrap();
//! assert!(json.contains(r##""borderColor":"#336699ff""##));
//!
//! let restored = AvatarProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::initials::Typeface;
use crate::layer::ColorFilter;
use crate::view::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_BORDER_COLOR, DEFAULT_BORDER_OVERLAY, DEFAULT_BORDER_WIDTH,
    DEFAULT_FONT_SCALE, DEFAULT_FONT_SIZE, DEFAULT_INITIALS, DEFAULT_TEXT_COLOR,
};

// ============================================================================
// Font Settings
// ============================================================================

/// Serializable form of a [`Typeface`].
///
/// ```json
/// { "family": "sans-serif", "bold": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FontSettings {
    pub family: String,

    #[serde(default)]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self::from(&Typeface::default_bold())
    }
}

impl From<&Typeface> for FontSettings {
    fn from(typeface: &Typeface) -> Self {
        Self {
            family: typeface.family.clone(),
            bold: typeface.bold,
            italic: typeface.italic,
        }
    }
}

impl From<FontSettings> for Typeface {
    fn from(font: FontSettings) -> Self {
        Typeface::new(font.family)
            .bold(font.bold)
            .italic(font.italic)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// Avatar Profile
// ============================================================================

/// Complete avatar configuration.
///
/// Missing fields deserialize to the built-in defaults, so an empty object
/// describes a default avatar. Colors are `#rrggbbaa` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct AvatarProfile {
    /// Border width in pixels. Zero or negative disables the border.
    pub border_width: i32,

    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub border_color: Color,

    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub background_color: Color,

    pub border_overlay: bool,

    pub circular_mask: bool,

    pub use_initials: bool,

    pub initials: String,

    pub font: FontSettings,

    /// Initials font size in pixels, before `font_scale` is applied.
    pub font_size: f32,

    pub font_scale: f32,

    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub text_color: Color,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_filter: Option<ColorFilter>,
}

impl Default for AvatarProfile {
    fn default() -> Self {
        Self {
            border_width: DEFAULT_BORDER_WIDTH,
            border_color: DEFAULT_BORDER_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
            border_overlay: DEFAULT_BORDER_OVERLAY,
            circular_mask: false,
            use_initials: false,
            initials: DEFAULT_INITIALS.to_string(),
            font: FontSettings::default(),
            font_size: DEFAULT_FONT_SIZE,
            font_scale: DEFAULT_FONT_SCALE,
            text_color: DEFAULT_TEXT_COLOR,
            color_filter: None,
        }
    }
}

impl AvatarProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Generates the JSON schema describing a profile.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AvatarProfile)
    }
}

// ============================================================================
// Tests
// ============================================================================
