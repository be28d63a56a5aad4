//! Color filters applied to the avatar bitmap before it is painted.

use image::RgbaImage;
use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A per-pixel color transformation for the avatar bitmap.
///
/// Filters never touch the border or background layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ColorFilter {
    /// Composites the color over each pixel, keeping the pixel's alpha.
    Tint(#[cfg_attr(feature = "jsonschema", schemars(with = "String"))] Color),

    /// Multiplies every channel, including alpha, by the color.
    Multiply(#[cfg_attr(feature = "jsonschema", schemars(with = "String"))] Color),

    /// Rotates hue by the given number of degrees.
    HueRotation(f32),

    /// Scales saturation; `0.0` yields grayscale.
    Saturation(f32),
}

impl ColorFilter {
    /// Returns a filtered copy of `image`.
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let mut result = image.clone();

        for pixel in result.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue; // Skip fully transparent pixels
            }
            pixel.0 = self.apply_pixel(r, g, b, a);
        }

        result
    }

    fn apply_pixel(&self, r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
        match *self {
            Self::Tint(color) => {
                let ca = color.a as f32 / 255.0;
                let mix = |src: u8, tint: u8| {
                    (tint as f32 * ca + src as f32 * (1.0 - ca)).round() as u8
                };
                [mix(r, color.r), mix(g, color.g), mix(b, color.b), a]
            }
            Self::Multiply(color) => {
                let mul = |src: u8, m: u8| ((src as u32 * m as u32 + 127) / 255) as u8;
                [mul(r, color.r), mul(g, color.g), mul(b, color.b), mul(a, color.a)]
            }
            Self::HueRotation(degrees) => {
                let mut hsl = to_hsl(r, g, b);
                hsl.hue += degrees;
                from_hsl(hsl, a)
            }
            Self::Saturation(factor) => {
                let mut hsl = to_hsl(r, g, b);
                hsl.saturation = (hsl.saturation * factor).clamp(0.0, 1.0);
                from_hsl(hsl, a)
            }
        }
    }
}

fn to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let rgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    rgb.into_color()
}

fn from_hsl(hsl: Hsl, a: u8) -> [u8; 4] {
    let rgb: Srgb = hsl.into_color();
    [
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
        a,
    ]
}
