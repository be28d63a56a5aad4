use crate::source::ResourceId;
use crate::view::ScaleType;

/// Errors raised while configuring an avatar surface or resolving its source.
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("scale type {0:?} not supported, only CenterCrop is allowed")]
    UnsupportedScaleType(ScaleType),

    #[error("adjustViewBounds not supported")]
    AdjustViewBoundsUnsupported,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to parse SVG: {0}")]
    Svg(String),

    #[error("failed to rasterize drawable at {width}x{height}")]
    Rasterize { width: u32, height: u32 },

    #[error("no resource with id {0}")]
    ResourceNotFound(ResourceId),

    #[error("emoji {0:?} cannot be resolved to an SVG")]
    UnresolvedEmoji(String),
}
