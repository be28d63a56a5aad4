//! The avatar render surface.
//!
//! [`AvatarView`] owns the configuration, resolved bitmap, derived geometry
//! and paints of a single avatar. The host UI forwards layout, draw and touch
//! callbacks to it and receives redraw requests through [`ViewHost`].

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, PixmapMut};

use crate::color::Color;
use crate::error::AvatarError;
use crate::geometry::{Geometry, Padding, ShaderMatrix, SizePx};
use crate::initials::{InitialsRenderer, Typeface};
use crate::layer::{BitmapPaint, ColorFilter, LayerStack, PaintStyle, SolidPaint};
use crate::profile::{AvatarProfile, FontSettings};
use crate::raster::pixmap_to_rgba_image;
use crate::source::{default_avatar, ImageSource, ResourceId};

pub const DEFAULT_BORDER_WIDTH: i32 = 5;
pub const DEFAULT_BORDER_COLOR: Color = Color::BLUE;
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::GREEN;
pub const DEFAULT_BORDER_OVERLAY: bool = false;
pub const DEFAULT_INITIALS: &str = "MA";
pub const DEFAULT_TEXT_COLOR: Color = Color::WHITE;
pub const DEFAULT_FONT_SIZE: f32 = 200.0;
pub const DEFAULT_FONT_SCALE: f32 = 1.0;

/// Largest share of the drawable rect the initials text may cover.
const INITIALS_TEXT_FILL: f32 = 0.8;

// ============================================================================
// Host Interface
// ============================================================================

/// How an image is scaled into the view bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleType {
    Matrix,
    FitXy,
    FitStart,
    FitCenter,
    FitEnd,
    Center,
    CenterCrop,
    CenterInside,
}

/// The only scale type an avatar supports.
pub const SCALE_TYPE: ScaleType = ScaleType::CenterCrop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    pub fn new(action: TouchAction, x: f32, y: f32) -> Self {
        Self { action, x, y }
    }
}

/// Resolves `start`/`end` padding to `left`/`right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Callbacks into the UI toolkit hosting an [`AvatarView`].
///
/// Every method has a default, so hosts only implement what they support.
pub trait ViewHost {
    /// Requests that the view be drawn again.
    fn invalidate(&mut self) {}

    /// Default touch handling, reached only for touches the avatar accepts.
    fn on_touch_event(&mut self, _event: &TouchEvent) -> bool {
        false
    }

    /// Looks up an image resource by id.
    fn load_resource(&self, _id: ResourceId) -> Option<ImageSource> {
        None
    }
}

/// A host with no resources that ignores redraw requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl ViewHost for DetachedHost {}

// ============================================================================
// Configuration
// ============================================================================

/// Trait for types that can be configured from an [`AvatarProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &AvatarProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> AvatarProfile;
}

/// User-settable properties of an avatar.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub border_width: i32,
    pub border_color: Color,
    pub background_color: Color,
    /// Paint the border over the image instead of beside it.
    pub border_overlay: bool,
    pub circular_mask: bool,
    pub use_initials: bool,
    pub initials: String,
    pub typeface: Typeface,
    /// Upper bound for the initials font size in pixels. The text is sized
    /// from the drawable height and never exceeds this.
    pub font_size: f32,
    /// Reduction applied to the initials font size, in `(0, 1]`.
    pub font_scale: f32,
    pub text_color: Color,
    pub color_filter: Option<ColorFilter>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            border_width: DEFAULT_BORDER_WIDTH,
            border_color: DEFAULT_BORDER_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
            border_overlay: DEFAULT_BORDER_OVERLAY,
            circular_mask: false,
            use_initials: false,
            initials: DEFAULT_INITIALS.to_string(),
            typeface: Typeface::default_bold(),
            font_size: DEFAULT_FONT_SIZE,
            font_scale: DEFAULT_FONT_SCALE,
            text_color: DEFAULT_TEXT_COLOR,
            color_filter: None,
        }
    }
}

/// Whether geometry can be computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No size has been assigned. `setup_pending` records a deferred
    /// recompute that runs once the first size arrives.
    Uninitialized { setup_pending: bool },
    Ready,
}

// ============================================================================
// AvatarView
// ============================================================================

/// A circular or rectangular avatar with a border and background.
///
/// # Example
///
/// ```
/// use circle_avatar::{AvatarView, Color, DetachedHost, ImageSource};
///
/// let mut view = AvatarView::new(DetachedHost).unwrap();
/// view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
/// view.set_circular_mask(true);
/// view.set_border_width(4);
/// view.on_size_changed(64, 64);
///
/// let frame = view.render().unwrap();
/// assert_eq!(frame.get_pixel(32, 32).0, [255, 0, 0, 255]);
/// assert_eq!(frame.get_pixel(0, 0).0[3], 0);
/// ```
pub struct AvatarView<H: ViewHost = DetachedHost> {
    host: H,
    config: RenderConfig,
    lifecycle: Lifecycle,

    size: SizePx,
    padding: Padding,
    layout_direction: LayoutDirection,

    /// The caller's source, `None` when showing the default asset.
    source: Option<ImageSource>,
    image: Arc<RgbaImage>,
    default_image: Arc<RgbaImage>,
    /// Cleared whenever an initials property changes.
    initials_bitmap: Option<Arc<RgbaImage>>,

    geometry: Option<Geometry>,
    layers: LayerStack,
}

impl<H: ViewHost> AvatarView<H> {
    /// Creates a view with the default configuration.
    pub fn new(host: H) -> Result<Self, AvatarError> {
        Self::with_config(host, RenderConfig::default())
    }

    /// Creates a view with `config`. Setup is deferred until the first size.
    pub fn with_config(host: H, config: RenderConfig) -> Result<Self, AvatarError> {
        let default_image = Arc::new(default_avatar()?);

        Ok(Self {
            host,
            config,
            lifecycle: Lifecycle::Uninitialized {
                setup_pending: true,
            },
            size: SizePx::default(),
            padding: Padding::default(),
            layout_direction: LayoutDirection::default(),
            source: None,
            image: Arc::clone(&default_image),
            default_image,
            initials_bitmap: None,
            geometry: None,
            layers: LayerStack::default(),
        })
    }

    // ---- Accessors ----

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_setup_pending(&self) -> bool {
        matches!(
            self.lifecycle,
            Lifecycle::Uninitialized {
                setup_pending: true
            }
        )
    }

    /// Derived layout, available once the view has a usable size.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn size(&self) -> SizePx {
        self.size
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn image_source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    /// The bitmap currently painted: initials, the caller's image, or the
    /// default asset.
    pub fn bitmap(&self) -> Arc<RgbaImage> {
        if self.config.use_initials {
            if let Some(initials) = &self.initials_bitmap {
                return Arc::clone(initials);
            }
        }
        Arc::clone(&self.image)
    }

    pub fn border_width(&self) -> i32 {
        self.config.border_width
    }

    pub fn border_color(&self) -> Color {
        self.config.border_color
    }

    pub fn background_color(&self) -> Color {
        self.config.background_color
    }

    pub fn is_border_overlay(&self) -> bool {
        self.config.border_overlay
    }

    pub fn is_circular_mask(&self) -> bool {
        self.config.circular_mask
    }

    pub fn uses_initials(&self) -> bool {
        self.config.use_initials
    }

    pub fn initials(&self) -> &str {
        &self.config.initials
    }

    pub fn typeface(&self) -> &Typeface {
        &self.config.typeface
    }

    pub fn font_size(&self) -> f32 {
        self.config.font_size
    }

    pub fn font_scale(&self) -> f32 {
        self.config.font_scale
    }

    pub fn text_color(&self) -> Color {
        self.config.text_color
    }

    pub fn color_filter(&self) -> Option<&ColorFilter> {
        self.config.color_filter.as_ref()
    }

    // ---- Geometry-affecting setters ----

    /// Sets the border width in pixels. Returns true if it changed.
    pub fn set_border_width(&mut self, width: i32) -> bool {
        if width == self.config.border_width {
            return false;
        }
        self.config.border_width = width;
        self.setup();
        true
    }

    pub fn set_border_overlay(&mut self, overlay: bool) -> bool {
        if overlay == self.config.border_overlay {
            return false;
        }
        self.config.border_overlay = overlay;
        self.setup();
        true
    }

    pub fn set_circular_mask(&mut self, circular: bool) -> bool {
        if circular == self.config.circular_mask {
            return false;
        }
        self.config.circular_mask = circular;
        // The initials fill takes the mask's shape.
        self.initials_bitmap = None;
        self.setup();
        true
    }

    pub fn set_use_initials(&mut self, use_initials: bool) -> bool {
        if use_initials == self.config.use_initials {
            return false;
        }
        self.config.use_initials = use_initials;
        self.initials_bitmap = None;
        self.setup();
        true
    }

    // ---- Paint-only setters ----

    pub fn set_border_color(&mut self, color: Color) -> bool {
        if color == self.config.border_color {
            return false;
        }
        self.config.border_color = color;
        self.layers.border.color = color;
        self.host.invalidate();
        true
    }

    pub fn set_background_color(&mut self, color: Color) -> bool {
        if color == self.config.background_color {
            return false;
        }
        self.config.background_color = color;
        self.layers.background.color = color;
        if self.config.use_initials {
            self.initials_bitmap = None;
            self.refresh_bitmap();
        }
        self.host.invalidate();
        true
    }

    pub fn set_color_filter(&mut self, filter: Option<ColorFilter>) -> bool {
        if filter == self.config.color_filter {
            return false;
        }
        self.config.color_filter = filter;
        if let Some(bitmap) = &mut self.layers.bitmap {
            bitmap.set_color_filter(filter);
        }
        self.host.invalidate();
        true
    }

    // ---- Initials setters ----

    pub fn set_initials(&mut self, initials: impl Into<String>) -> bool {
        let initials = initials.into();
        if initials == self.config.initials {
            return false;
        }
        self.config.initials = initials;
        self.initials_changed();
        true
    }

    pub fn set_typeface(&mut self, typeface: Typeface) -> bool {
        if typeface == self.config.typeface {
            return false;
        }
        self.config.typeface = typeface;
        self.initials_changed();
        true
    }

    pub fn set_font_size(&mut self, size: f32) -> bool {
        if size == self.config.font_size {
            return false;
        }
        self.config.font_size = size;
        self.initials_changed();
        true
    }

    pub fn set_font_scale(&mut self, scale: f32) -> bool {
        if scale == self.config.font_scale {
            return false;
        }
        self.config.font_scale = scale;
        self.initials_changed();
        true
    }

    pub fn set_text_color(&mut self, color: Color) -> bool {
        if color == self.config.text_color {
            return false;
        }
        self.config.text_color = color;
        self.initials_changed();
        true
    }

    fn initials_changed(&mut self) {
        self.initials_bitmap = None;
        if self.config.use_initials && self.refresh_bitmap() {
            self.host.invalidate();
        }
    }

    // ---- Image source ----

    /// Replaces the image source. `None` shows the default asset.
    ///
    /// The source is resolved before anything changes, so a failure leaves
    /// the view untouched.
    pub fn set_image(&mut self, source: Option<ImageSource>) -> Result<(), AvatarError> {
        let image = match &source {
            Some(source) => source.resolve(|id| self.host.load_resource(id))?,
            None => {
                log::debug!("image source cleared, showing default avatar");
                Arc::clone(&self.default_image)
            }
        };

        self.source = source;
        self.image = image;
        self.setup();
        Ok(())
    }

    pub fn set_image_bitmap(&mut self, bitmap: RgbaImage) -> Result<(), AvatarError> {
        self.set_image(Some(ImageSource::bitmap(bitmap)))
    }

    pub fn set_image_resource(&mut self, id: ResourceId) -> Result<(), AvatarError> {
        self.set_image(Some(ImageSource::Resource(id)))
    }

    pub fn set_image_uri(&mut self, path: impl Into<PathBuf>) -> Result<(), AvatarError> {
        self.set_image(Some(ImageSource::Path(path.into())))
    }

    // ---- Fixed behavior ----

    pub fn scale_type(&self) -> ScaleType {
        SCALE_TYPE
    }

    /// Only [`ScaleType::CenterCrop`] is accepted.
    pub fn set_scale_type(&mut self, scale_type: ScaleType) -> Result<(), AvatarError> {
        if scale_type != SCALE_TYPE {
            return Err(AvatarError::UnsupportedScaleType(scale_type));
        }
        Ok(())
    }

    pub fn adjust_view_bounds(&self) -> bool {
        false
    }

    /// Bounds adjustment cannot be enabled.
    pub fn set_adjust_view_bounds(&mut self, adjust: bool) -> Result<(), AvatarError> {
        if adjust {
            return Err(AvatarError::AdjustViewBoundsUnsupported);
        }
        Ok(())
    }

    // ---- Layout callbacks ----

    /// Called by the host when the view is resized.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        self.size = SizePx::new(width, height);

        if let Lifecycle::Uninitialized { setup_pending } = self.lifecycle {
            if !self.size.is_empty() {
                if setup_pending {
                    log::debug!("replaying deferred avatar setup at {width}x{height}");
                }
                self.lifecycle = Lifecycle::Ready;
            }
        }

        self.setup();
    }

    pub fn set_padding(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        self.padding = Padding::new(left, top, right, bottom);
        self.setup();
    }

    /// Sets padding by `start`/`end`, resolved against the layout direction.
    pub fn set_padding_relative(&mut self, start: i32, top: i32, end: i32, bottom: i32) {
        match self.layout_direction {
            LayoutDirection::Ltr => self.set_padding(start, top, end, bottom),
            LayoutDirection::Rtl => self.set_padding(end, top, start, bottom),
        }
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    /// Affects later [`set_padding_relative`](Self::set_padding_relative) calls.
    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        self.layout_direction = direction;
    }

    // ---- Drawing ----

    /// Draws the avatar onto a canvas in view coordinates.
    pub fn draw(&self, canvas: &mut PixmapMut<'_>) {
        if let Some(geometry) = &self.geometry {
            self.layers
                .draw(canvas, geometry, self.config.circular_mask);
        }
    }

    /// Renders the whole view to a new image, or `None` while it has no size.
    pub fn render(&self) -> Option<RgbaImage> {
        let mut pixmap = Pixmap::new(self.size.width, self.size.height)?;
        self.draw(&mut pixmap.as_mut());
        Some(pixmap_to_rgba_image(&pixmap))
    }

    // ---- Touch ----

    /// Under the circular mask, touches outside the disc are rejected before
    /// reaching the host.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.config.circular_mask {
            return self.host.on_touch_event(event);
        }

        self.in_touchable_area(event.x, event.y) && self.host.on_touch_event(event)
    }

    pub fn in_touchable_area(&self, x: f32, y: f32) -> bool {
        self.geometry
            .as_ref()
            .is_none_or(|geometry| geometry.in_touchable_area(x, y))
    }

    // ---- Setup ----

    /// Recomputes geometry and paints, then requests a redraw.
    fn setup(&mut self) {
        if let Lifecycle::Uninitialized { setup_pending } = &mut self.lifecycle {
            log::trace!("avatar not sized yet, deferring setup");
            *setup_pending = true;
            return;
        }

        let Some(geometry) = Geometry::compute(
            self.size,
            self.padding,
            self.config.border_width,
            self.config.border_overlay,
        ) else {
            return;
        };
        self.geometry = Some(geometry);
        log::trace!("avatar geometry {geometry:?}");

        if self.config.use_initials && !self.initials_fit(&geometry) {
            self.initials_bitmap = None;
        }
        self.rebuild_paints();
        self.host.invalidate();
    }

    fn rebuild_paints(&mut self) {
        let style = if self.config.circular_mask {
            PaintStyle::Stroke
        } else {
            PaintStyle::FillAndStroke
        };
        self.layers.border = SolidPaint::stroke(
            self.config.border_color,
            style,
            self.config.border_width as f32,
        );
        self.layers.background = SolidPaint::fill(self.config.background_color);
        self.rebuild_bitmap_paint();
    }

    /// Regenerates initials if needed and rebuilds the bitmap shader.
    ///
    /// Returns false if there is no geometry to paint into yet.
    fn refresh_bitmap(&mut self) -> bool {
        if self.geometry.is_none() {
            return false;
        }
        self.rebuild_bitmap_paint();
        true
    }

    fn rebuild_bitmap_paint(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };

        if self.config.use_initials && self.initials_bitmap.is_none() {
            self.initials_bitmap = self.generate_initials(&geometry);
        }

        self.layers.bitmap = BitmapPaint::new(self.bitmap(), self.config.color_filter);
        if let Some(bitmap) = &mut self.layers.bitmap {
            bitmap.matrix = ShaderMatrix::cover(bitmap.bitmap_size(), &geometry.drawable_rect);
        }
    }

    fn initials_fit(&self, geometry: &Geometry) -> bool {
        let (width, height) = initials_size(geometry);
        self.initials_bitmap
            .as_ref()
            .is_some_and(|bitmap| bitmap.dimensions() == (width, height))
    }

    /// The text starts at the drawable height, capped by the configured font
    /// size and reduced by the font scale, then shrinks until it fits.
    fn initials_renderer(&self, geometry: &Geometry) -> InitialsRenderer {
        let (width, height) = initials_size(geometry);
        let (width, height) = (width as f32, height as f32);

        let builder = InitialsRenderer::builder()
            .text_color(self.config.text_color)
            .use_font(self.config.typeface.clone())
            .font_size(self.config.font_size.min(height) * self.config.font_scale)
            .bold()
            .to_upper_case();

        let renderer = if self.config.circular_mask {
            builder.build_round(&self.config.initials, self.config.background_color)
        } else {
            builder.build_rect(&self.config.initials, self.config.background_color)
        };
        renderer.fit_within(width * INITIALS_TEXT_FILL, height * INITIALS_TEXT_FILL)
    }

    fn generate_initials(&self, geometry: &Geometry) -> Option<Arc<RgbaImage>> {
        let (width, height) = initials_size(geometry);
        match self.initials_renderer(geometry).render(width, height) {
            Ok(bitmap) => Some(Arc::new(bitmap)),
            Err(err) => {
                log::warn!("initials avatar failed to render, using image instead: {err}");
                None
            }
        }
    }
}

fn initials_size(geometry: &Geometry) -> (u32, u32) {
    let rect = &geometry.drawable_rect;
    (
        rect.width().max(1.0) as u32,
        rect.height().max(1.0) as u32,
    )
}

impl<H: ViewHost> Configurable for AvatarView<H> {
    /// Applies each setting through its setter, so unchanged values stay
    /// no-ops.
    fn apply_profile(&mut self, profile: &AvatarProfile) {
        self.set_border_width(profile.border_width);
        self.set_border_color(profile.border_color);
        self.set_background_color(profile.background_color);
        self.set_border_overlay(profile.border_overlay);
        self.set_circular_mask(profile.circular_mask);
        self.set_initials(profile.initials.clone());
        self.set_typeface(profile.font.clone().into());
        self.set_font_size(profile.font_size);
        self.set_font_scale(profile.font_scale);
        self.set_text_color(profile.text_color);
        self.set_color_filter(profile.color_filter);
        self.set_use_initials(profile.use_initials);
    }

    fn export_profile(&self) -> AvatarProfile {
        AvatarProfile {
            border_width: self.config.border_width,
            border_color: self.config.border_color,
            background_color: self.config.background_color,
            border_overlay: self.config.border_overlay,
            circular_mask: self.config.circular_mask,
            use_initials: self.config.use_initials,
            initials: self.config.initials.clone(),
            font: FontSettings::from(&self.config.typeface),
            font_size: self.config.font_size,
            font_scale: self.config.font_scale,
            text_color: self.config.text_color,
            color_filter: self.config.color_filter,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectF;
    use crate::source::SvgSource;
    use image::Rgba;

    #[derive(Default)]
    struct CountingHost {
        invalidations: usize,
        touches: usize,
    }

    impl ViewHost for CountingHost {
        fn invalidate(&mut self) {
            self.invalidations += 1;
        }

        fn on_touch_event(&mut self, _event: &TouchEvent) -> bool {
            self.touches += 1;
            true
        }

        fn load_resource(&self, id: ResourceId) -> Option<ImageSource> {
            (id == ResourceId(1)).then(|| ImageSource::Color(Color::RED))
        }
    }

    fn sized_view(size: u32) -> AvatarView<CountingHost> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut view = AvatarView::new(CountingHost::default()).unwrap();
        view.on_size_changed(size, size);
        view
    }

    #[test]
    fn setup_is_deferred_until_sized() {
        let mut view = AvatarView::new(CountingHost::default()).unwrap();
        assert!(view.is_setup_pending());

        assert!(view.set_border_width(10));
        assert!(view.geometry().is_none());
        assert_eq!(view.host().invalidations, 0);

        view.on_size_changed(0, 0);
        assert!(view.is_setup_pending());

        view.on_size_changed(200, 200);
        assert_eq!(view.lifecycle(), Lifecycle::Ready);
        assert_eq!(view.host().invalidations, 1);

        let g = view.geometry().unwrap();
        assert_eq!(g.border_rect, RectF::from_ltrb(0.0, 0.0, 200.0, 200.0));
        assert_eq!(g.background_rect, RectF::from_ltrb(10.0, 10.0, 190.0, 190.0));
        assert_eq!(g.drawable_rect, RectF::from_ltrb(9.0, 9.0, 191.0, 191.0));
        assert_eq!(g.border_radius, 95.0);
    }

    #[test]
    fn unchanged_values_are_no_ops() {
        let mut view = sized_view(100);
        let before = view.host().invalidations;
        let config = view.config().clone();

        assert!(!view.set_border_width(config.border_width));
        assert!(!view.set_border_color(config.border_color));
        assert!(!view.set_background_color(config.background_color));
        assert!(!view.set_border_overlay(config.border_overlay));
        assert!(!view.set_circular_mask(config.circular_mask));
        assert!(!view.set_use_initials(config.use_initials));
        assert!(!view.set_initials(config.initials.clone()));
        assert!(!view.set_typeface(config.typeface.clone()));
        assert!(!view.set_font_size(config.font_size));
        assert!(!view.set_font_scale(config.font_scale));
        assert!(!view.set_text_color(config.text_color));
        assert!(!view.set_color_filter(config.color_filter));

        assert_eq!(view.host().invalidations, before);
    }

    #[test]
    fn border_width_round_trips() {
        let mut view = sized_view(100);
        for width in [0, 1, 5, 100] {
            view.set_border_width(width);
            assert_eq!(view.border_width(), width);
        }
    }

    #[test]
    fn border_color_skips_geometry() {
        let mut view = sized_view(100);
        let before = view.host().invalidations;
        let geometry = *view.geometry().unwrap();

        assert!(view.set_border_color(Color::RED));
        assert_eq!(view.layers().border.color, Color::RED);
        assert_eq!(view.geometry(), Some(&geometry));
        assert_eq!(view.host().invalidations, before + 1);
    }

    #[test]
    fn unsupported_scale_type_fails_without_side_effects() {
        let mut view = sized_view(100);
        let before = view.host().invalidations;

        let err = view.set_scale_type(ScaleType::FitXy).unwrap_err();
        assert!(matches!(err, AvatarError::UnsupportedScaleType(ScaleType::FitXy)));
        assert_eq!(view.scale_type(), ScaleType::CenterCrop);
        assert_eq!(view.host().invalidations, before);

        assert!(view.set_scale_type(ScaleType::CenterCrop).is_ok());
        assert!(view.set_adjust_view_bounds(false).is_ok());
        assert!(matches!(
            view.set_adjust_view_bounds(true),
            Err(AvatarError::AdjustViewBoundsUnsupported)
        ));
        assert!(!view.adjust_view_bounds());
    }

    #[test]
    fn circular_touch_is_limited_to_disc() {
        let mut view = sized_view(200);
        view.set_border_width(10);
        view.set_circular_mask(true);

        assert!(view.on_touch_event(&TouchEvent::new(TouchAction::Down, 100.0, 100.0)));
        assert_eq!(view.host().touches, 1);

        assert!(!view.on_touch_event(&TouchEvent::new(TouchAction::Down, 2.0, 2.0)));
        assert_eq!(view.host().touches, 1, "rejected touches never reach the host");

        view.set_circular_mask(false);
        assert!(view.on_touch_event(&TouchEvent::new(TouchAction::Down, 2.0, 2.0)));
        assert_eq!(view.host().touches, 2);
    }

    #[test]
    fn padding_moves_touchable_disc() {
        let mut view = AvatarView::new(CountingHost::default()).unwrap();
        view.on_size_changed(200, 100);
        view.set_circular_mask(true);
        assert!(view.in_touchable_area(100.0, 50.0));
        assert!(view.in_touchable_area(55.0, 50.0));

        // Square is now x in 70..170.
        view.set_padding(40, 0, 0, 0);
        assert!(view.in_touchable_area(120.0, 50.0));
        assert!(!view.in_touchable_area(55.0, 50.0));

        // Square is now x in 100..200.
        view.set_padding(100, 0, 0, 0);
        assert!(view.in_touchable_area(150.0, 50.0));
        assert!(!view.in_touchable_area(100.0, 50.0));
        assert!(!view.on_touch_event(&TouchEvent::new(TouchAction::Down, 100.0, 50.0)));
        assert_eq!(view.host().touches, 0);
    }

    #[test]
    fn unsized_view_accepts_all_touches() {
        let mut view = AvatarView::new(CountingHost::default()).unwrap();
        view.set_circular_mask(true);
        assert!(view.on_touch_event(&TouchEvent::new(TouchAction::Up, 500.0, 500.0)));
    }

    #[test]
    fn failed_source_leaves_view_untouched() {
        let mut view = sized_view(50);
        view.set_image_bitmap(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])))
            .unwrap();
        let before = view.bitmap();
        let invalidations = view.host().invalidations;

        let result = view.set_image(Some(ImageSource::Encoded(vec![0, 1, 2])));
        assert!(matches!(result, Err(AvatarError::Decode(_))));
        assert!(Arc::ptr_eq(&before, &view.bitmap()));
        assert_eq!(view.host().invalidations, invalidations);
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("circle-avatar-{}-{name}", std::process::id()))
    }

    #[test]
    fn uri_source_loads_file() {
        let path = temp_path("uri.png");
        RgbaImage::from_pixel(6, 3, Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();

        let mut view = sized_view(50);
        view.set_image_uri(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(view.bitmap().dimensions(), (6, 3));
        assert!(matches!(view.image_source(), Some(ImageSource::Path(p)) if *p == path));
        assert_eq!(view.render().unwrap().get_pixel(25, 25).0, [0, 0, 255, 255]);
    }

    #[test]
    fn missing_uri_leaves_view_untouched() {
        let mut view = sized_view(50);
        view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
        let before = view.bitmap();
        let invalidations = view.host().invalidations;

        let result = view.set_image_uri(temp_path("does-not-exist.png"));
        assert!(matches!(result, Err(AvatarError::Decode(_))));
        assert!(Arc::ptr_eq(&before, &view.bitmap()));
        assert!(matches!(view.image_source(), Some(ImageSource::Color(Color::RED))));
        assert_eq!(view.host().invalidations, invalidations);
    }

    #[test]
    fn vector_source_rasterizes_at_intrinsic_size() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="20">
            <rect width="30" height="20" fill="#ff0000"/>
        </svg>"##;
        let mut view = sized_view(50);
        view.set_image(Some(ImageSource::Vector(SvgSource::from_svg(svg))))
            .unwrap();

        assert_eq!(view.bitmap().dimensions(), (30, 20));
        assert_eq!(view.render().unwrap().get_pixel(25, 25).0, [255, 0, 0, 255]);
    }

    #[test]
    fn invalid_vector_source_is_rejected() {
        let mut view = sized_view(50);
        let result = view.set_image(Some(ImageSource::Vector(SvgSource::from_svg("<svg"))));
        assert!(matches!(result, Err(AvatarError::Svg(_))));
        assert!(view.image_source().is_none());
    }

    #[test]
    fn resources_resolve_through_host() {
        let mut view = sized_view(50);
        view.set_image_resource(ResourceId(1)).unwrap();
        assert_eq!(view.bitmap().dimensions(), (2, 2));

        assert!(matches!(
            view.set_image_resource(ResourceId(2)),
            Err(AvatarError::ResourceNotFound(ResourceId(2)))
        ));
    }

    #[test]
    fn clearing_source_restores_default() {
        let mut view = sized_view(50);
        view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
        view.set_image(None).unwrap();
        assert!(view.image_source().is_none());
        assert_eq!(view.bitmap().width(), crate::source::DEFAULT_AVATAR_SIZE);
    }

    #[test]
    fn circular_render_layers() {
        let mut view = sized_view(100);
        view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
        view.set_border_width(10);
        view.set_circular_mask(true);

        let frame = view.render().unwrap();
        assert_eq!(frame.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(frame.get_pixel(50, 1).0, [0, 0, 255, 255]);
        assert_eq!(frame.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn rectangular_render_fills_corners() {
        let mut view = sized_view(100);
        view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
        view.set_border_width(10);

        let frame = view.render().unwrap();
        assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(frame.get_pixel(50, 50).0, [255, 0, 0, 255]);
    }

    #[test]
    fn overlay_paints_image_to_the_edge() {
        let mut view = sized_view(100);
        view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
        view.set_border_width(10);
        view.set_border_overlay(true);

        let frame = view.render().unwrap();
        assert_eq!(frame.get_pixel(2, 50).0, [255, 0, 0, 255]);
    }

    #[test]
    fn color_filter_applies_to_bitmap_only() {
        let mut view = sized_view(100);
        view.set_image(Some(ImageSource::Color(Color::RED))).unwrap();
        view.set_border_width(10);
        assert!(view.set_color_filter(Some(ColorFilter::Tint(Color::WHITE))));

        let frame = view.render().unwrap();
        assert_eq!(frame.get_pixel(50, 50).0, [255, 255, 255, 255]);
        assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn initials_bitmap_matches_drawable_rect() {
        let mut view = sized_view(120);
        view.set_border_width(0);
        assert!(view.set_use_initials(true));
        assert_eq!(view.bitmap().dimensions(), (120, 120));

        view.on_size_changed(80, 100);
        assert_eq!(view.bitmap().dimensions(), (80, 80));
    }

    #[test]
    fn default_initials_fit_the_avatar() {
        let mut view = sized_view(100);
        view.set_use_initials(true);
        let bitmap = view.bitmap();
        assert_eq!(bitmap.dimensions(), (92, 92));

        let geometry = *view.geometry().unwrap();
        let renderer = view.initials_renderer(&geometry);
        assert!(renderer.config().font_size <= 92.0);
        if let Some((width, height)) = renderer.measure() {
            assert!(width <= bitmap.width() as f32, "text width {width}");
            assert!(height <= bitmap.height() as f32, "text height {height}");
        }
    }

    #[test]
    fn font_scale_reduces_initials() {
        let mut view = sized_view(100);
        view.set_use_initials(true);
        let geometry = *view.geometry().unwrap();
        let full = view.initials_renderer(&geometry).config().font_size;

        view.set_font_scale(0.25);
        let scaled = view.initials_renderer(&geometry).config().font_size;
        assert!(scaled < full);
        assert!(scaled <= 92.0 * 0.25);
    }

    #[test]
    fn initials_properties_regenerate_bitmap() {
        let mut view = sized_view(60);
        view.set_use_initials(true);
        let first = view.bitmap();
        let invalidations = view.host().invalidations;

        assert!(view.set_initials("JD"));
        assert!(!Arc::ptr_eq(&first, &view.bitmap()));
        assert_eq!(view.host().invalidations, invalidations + 1);
    }

    #[test]
    fn initials_properties_are_stored_when_unused() {
        let mut view = sized_view(60);
        let invalidations = view.host().invalidations;

        assert!(view.set_text_color(Color::BLACK));
        assert!(view.set_font_scale(0.5));
        assert_eq!(view.text_color(), Color::BLACK);
        assert_eq!(view.host().invalidations, invalidations);
    }

    #[test]
    fn initials_fill_uses_background_color() {
        let mut view = sized_view(60);
        view.set_border_width(0);
        view.set_initials("");
        view.set_use_initials(true);
        view.set_background_color(Color::RED);

        assert_eq!(view.bitmap().get_pixel(1, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn relative_padding_follows_direction() {
        let mut view = sized_view(100);
        view.set_layout_direction(LayoutDirection::Rtl);
        view.set_padding_relative(10, 0, 30, 0);
        assert_eq!(view.padding(), Padding::new(30, 0, 10, 0));
    }

    #[test]
    fn padding_consuming_everything_keeps_old_geometry() {
        let mut view = sized_view(100);
        let geometry = *view.geometry().unwrap();
        view.set_padding(60, 0, 60, 0);
        assert_eq!(view.geometry(), Some(&geometry));
    }

    #[test]
    fn profile_round_trip() {
        let mut view = sized_view(64);
        view.set_border_width(3);
        view.set_circular_mask(true);
        view.set_color_filter(Some(ColorFilter::Saturation(0.0)));

        let profile = view.export_profile();
        let mut other = sized_view(64);
        other.apply_profile(&profile);

        assert_eq!(other.config(), view.config());
    }
}
