//! Initials placeholder rendering.
//!
//! [`InitialsRenderer`] draws a short piece of text centered over a filled
//! circle or rectangle. The text and shape are emitted as an SVG document and
//! rasterized with resvg, so glyphs come from the system font database.
//!
//! # Example
//!
//! ```
//! use circle_avatar::{Color, InitialsRenderer, Typeface};
//!
//! let renderer = InitialsRenderer::builder()
//!     .text_color(Color::WHITE)
//!     .use_font(Typeface::default_bold())
//!     .font_size(48.0)
//!     .to_upper_case()
//!     .build_round("jd", Color::BLUE);
//!
//! let bitmap = renderer.render(96, 96).unwrap();
//! assert_eq!(bitmap.dimensions(), (96, 96));
//! ```

use image::RgbaImage;

use crate::color::Color;
use crate::error::AvatarError;
use crate::raster::{parse_svg, rasterize_svg};

// ============================================================================
// Typeface
// ============================================================================

/// A font family with style flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Typeface {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl Typeface {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            bold: false,
            italic: false,
        }
    }

    /// The generic sans-serif family in bold.
    pub fn default_bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

/// Shape of the filled area behind the initials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialsShape {
    Round,
    #[default]
    Rect,
}

// ============================================================================
// Config & Builder
// ============================================================================

/// Text styling shared by every shape.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialsConfig {
    pub text_color: Color,
    pub typeface: Typeface,
    pub bold: bool,
    pub upper_case: bool,
    /// Font size in pixels.
    pub font_size: f32,
}

impl Default for InitialsConfig {
    fn default() -> Self {
        Self {
            text_color: Color::WHITE,
            typeface: Typeface::default(),
            bold: false,
            upper_case: false,
            font_size: 14.0,
        }
    }
}

/// Builder for [`InitialsRenderer`].
#[derive(Debug, Clone, Default)]
pub struct InitialsBuilder {
    config: InitialsConfig,
}

impl InitialsBuilder {
    pub fn text_color(mut self, color: Color) -> Self {
        self.config.text_color = color;
        self
    }

    pub fn use_font(mut self, typeface: Typeface) -> Self {
        self.config.typeface = typeface;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.config.font_size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.config.bold = true;
        self
    }

    pub fn to_upper_case(mut self) -> Self {
        self.config.upper_case = true;
        self
    }

    pub fn build_round(self, text: impl Into<String>, fill: Color) -> InitialsRenderer {
        self.build(text, fill, InitialsShape::Round)
    }

    pub fn build_rect(self, text: impl Into<String>, fill: Color) -> InitialsRenderer {
        self.build(text, fill, InitialsShape::Rect)
    }

    pub fn build(self, text: impl Into<String>, fill: Color, shape: InitialsShape) -> InitialsRenderer {
        InitialsRenderer {
            text: text.into(),
            fill,
            shape,
            config: self.config,
        }
    }
}

// ============================================================================
// InitialsRenderer
// ============================================================================

/// Renders text over a filled circle or rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialsRenderer {
    text: String,
    fill: Color,
    shape: InitialsShape,
    config: InitialsConfig,
}

impl InitialsRenderer {
    pub fn builder() -> InitialsBuilder {
        InitialsBuilder::default()
    }

    pub fn shape(&self) -> InitialsShape {
        self.shape
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn config(&self) -> &InitialsConfig {
        &self.config
    }

    /// The text as it will be drawn, after case conversion.
    pub fn display_text(&self) -> String {
        if self.config.upper_case {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        }
    }

    /// Returns the laid-out size of the text alone.
    ///
    /// `None` when the text is blank or no installed font could shape it.
    pub fn measure(&self) -> Option<(f32, f32)> {
        if self.text.trim().is_empty() {
            return None;
        }

        let side = (self.config.font_size.max(1.0) * 2.0).ceil() as u32;
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{side}" height="{side}">{}</svg>"#,
            self.text_element(side, side)
        );
        let tree = parse_svg(&svg).ok()?;
        if !tree.root().has_children() {
            return None;
        }

        let bbox = tree.root().bounding_box();
        Some((bbox.width(), bbox.height()))
    }

    /// Shrinks the font until the laid-out text fits `max_width x max_height`.
    ///
    /// Text that cannot be measured keeps its font size.
    pub fn fit_within(mut self, max_width: f32, max_height: f32) -> Self {
        let Some((width, height)) = self.measure() else {
            return self;
        };
        if width <= 0.0 || height <= 0.0 {
            return self;
        }

        let scale = (max_width / width).min(max_height / height);
        if scale < 1.0 {
            self.config.font_size *= scale.max(0.0);
        }
        self
    }

    /// Renders a `width x height` bitmap. Zero dimensions are raised to 1.
    pub fn render(&self, width: u32, height: u32) -> Result<RgbaImage, AvatarError> {
        rasterize_svg(&self.to_svg(width.max(1), height.max(1)))
    }

    /// Builds the SVG document [`render`](Self::render) rasterizes.
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let shape = match self.shape {
            InitialsShape::Round => format!(
                r#"<ellipse cx="{cx}" cy="{cy}" rx="{cx}" ry="{cy}" fill="{fill}" fill-opacity="{opacity}"/>"#,
                cx = width as f32 / 2.0,
                cy = height as f32 / 2.0,
                fill = self.fill.to_rgb_hex(),
                opacity = self.fill.opacity(),
            ),
            InitialsShape::Rect => format!(
                r#"<rect width="{width}" height="{height}" fill="{fill}" fill-opacity="{opacity}"/>"#,
                fill = self.fill.to_rgb_hex(),
                opacity = self.fill.opacity(),
            ),
        };

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{shape}{text}</svg>"#,
            text = self.text_element(width, height),
        )
    }

    fn text_element(&self, width: u32, height: u32) -> String {
        let weight = if self.config.bold || self.config.typeface.bold {
            "bold"
        } else {
            "normal"
        };
        let style = if self.config.typeface.italic {
            "italic"
        } else {
            "normal"
        };

        format!(
            r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" font-weight="{weight}" font-style="{style}" fill="{color}" fill-opacity="{opacity}" text-anchor="middle" dominant-baseline="central">{content}</text>"#,
            x = width as f32 / 2.0,
            y = height as f32 / 2.0,
            family = font_family_attr(&self.config.typeface.family),
            size = self.config.font_size.max(0.0),
            color = self.config.text_color.to_rgb_hex(),
            opacity = self.config.text_color.opacity(),
            content = escape_xml(&self.display_text()),
        )
    }
}

/// Generic family keywords must stay unquoted to keep their meaning.
fn font_family_attr(family: &str) -> String {
    match family {
        "serif" | "sans-serif" | "monospace" | "cursive" | "fantasy" => family.to_string(),
        _ => format!("'{}'", escape_xml(family)),
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_config() {
        let renderer = InitialsRenderer::builder()
            .text_color(Color::BLACK)
            .use_font(Typeface::new("Serif"))
            .font_size(30.0)
            .bold()
            .to_upper_case()
            .build_rect("ab", Color::GREEN);

        assert_eq!(renderer.shape(), InitialsShape::Rect);
        assert_eq!(renderer.fill(), Color::GREEN);
        assert_eq!(renderer.config().font_size, 30.0);
        assert!(renderer.config().bold);
        assert_eq!(renderer.display_text(), "AB");
    }

    #[test]
    fn svg_escapes_text() {
        let renderer = InitialsRenderer::builder().build_round("<&>", Color::RED);
        let svg = renderer.to_svg(10, 10);
        assert!(svg.contains("&lt;&amp;&gt;"));
        assert!(svg.contains("<ellipse"));
    }

    #[test]
    fn round_shape_leaves_corners_transparent() {
        let renderer = InitialsRenderer::builder().build_round("", Color::RED);
        let img = renderer.render(40, 40).unwrap();
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0, 255]);
    }

    #[test]
    fn rect_shape_fills_everything() {
        let renderer = InitialsRenderer::builder().build_rect("", Color::BLUE);
        let img = renderer.render(16, 8).unwrap();
        assert_eq!(img.dimensions(), (16, 8));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(15, 7).0, [0, 0, 255, 255]);
    }

    #[test]
    fn zero_size_is_raised_to_one_pixel() {
        let renderer = InitialsRenderer::builder().build_rect("X", Color::BLUE);
        assert_eq!(renderer.render(0, 0).unwrap().dimensions(), (1, 1));
    }

    #[test]
    fn fit_within_shrinks_oversized_text() {
        let renderer = InitialsRenderer::builder()
            .font_size(200.0)
            .bold()
            .build_rect("MA", Color::BLUE);
        let Some((width, _)) = renderer.measure() else {
            return; // no system fonts
        };
        assert!(width > 80.0);

        let fitted = renderer.fit_within(80.0, 80.0);
        assert!(fitted.config().font_size < 200.0);
        let (width, height) = fitted.measure().unwrap();
        assert!(width <= 80.5, "width {width}");
        assert!(height <= 80.5, "height {height}");
    }

    #[test]
    fn fit_within_keeps_small_text() {
        let renderer = InitialsRenderer::builder()
            .font_size(10.0)
            .build_rect("A", Color::BLUE)
            .fit_within(500.0, 500.0);
        assert_eq!(renderer.config().font_size, 10.0);
    }

    #[test]
    fn blank_text_has_no_measure() {
        let renderer = InitialsRenderer::builder().build_rect("  ", Color::BLUE);
        assert!(renderer.measure().is_none());
    }
}
