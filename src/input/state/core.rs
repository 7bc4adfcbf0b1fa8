//! Stroke engine state and the shared per-dab paint routine.

use crate::draw::raster::DEFAULT_SPLATTER_COUNT;
use crate::draw::{
    AffineTransform, BrushConfig, BrushShape, Color, PixelBuffer, Point2D, RasterBuffer,
    SourceImage,
};
use crate::error::PaintError;
use crate::input::events::TouchSample;
use crate::util::{self, Rect};
use log::{debug, info, trace, warn};
use rand::Rng;

/// Margin kept around the image inside the raster so dabs at the edge are not cut.
pub const DEFAULT_INSET: u32 = 20;

/// Upper bound applied to speeds before deriving radius and opacity.
const MAX_SPEED: i64 = 10_000;

/// Engine lifecycle.
///
/// `NotReady` until a source image is bound; `Dragging` while a pointer is in
/// contact; back to `Ready` on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No source image bound yet - every pointer event is a no-op
    NotReady,
    /// Image bound and raster allocated, no active contact
    Ready,
    /// A single pointer is in contact and painting
    Dragging,
}

/// Tunables that shape strokes and the auto-paint sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Raster margin around the image on every side
    pub inset: u32,
    /// Grid spacing of the auto-paint sweep in image pixels
    pub auto_paint_step: u32,
    /// Maximum jitter added to each auto-paint grid point
    pub auto_paint_jitter: i32,
    /// Maximum synthesized speed for auto-paint dabs
    pub auto_paint_max_speed: i32,
    /// Number of discs in a splatter dab
    pub splatter_count: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            inset: DEFAULT_INSET,
            auto_paint_step: 10,
            auto_paint_jitter: 5,
            auto_paint_max_speed: 10,
            splatter_count: DEFAULT_SPLATTER_COUNT,
        }
    }
}

/// One stamped brush mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeDab {
    /// Image-space pixel the color was sampled from
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub alpha: u8,
    pub color: Color,
    pub shape: BrushShape,
    /// Raster area the dab touched
    pub damage: Option<Rect>,
}

/// Source image plus the raster painted over it.
#[derive(Debug, Clone)]
pub(crate) struct Canvas {
    pub(crate) source: SourceImage,
    pub(crate) raster: RasterBuffer,
}

/// Converts pointer input into dabs on the off-screen raster.
///
/// Owns the source image and raster once bound; the pointer handlers live in
/// `pointer.rs` and the full-canvas sweep in `autopaint.rs`.
#[derive(Debug)]
pub struct StrokeEngine {
    pub(crate) state: EngineState,
    pub(crate) canvas: Option<Canvas>,
    pub(crate) brush: BrushConfig,
    pub(crate) settings: EngineSettings,
    /// Image-to-view transform as supplied by the host
    transform: AffineTransform,
    /// View-to-image mapping; `None` while degraded to identity
    inverse: Option<AffineTransform>,
    transform_degraded: bool,
    /// Image-space area currently visible in the view, if known
    visible: Option<Rect>,
    pub(crate) last_sample: Option<TouchSample>,
    /// True until the first contact after binding has primed `last_sample`
    pub(crate) first_touch: bool,
}

impl Default for StrokeEngine {
    fn default() -> Self {
        Self::new(BrushConfig::default(), EngineSettings::default())
    }
}

impl StrokeEngine {
    /// Creates an unbound engine. An invalid brush falls back to the default one.
    pub fn new(brush: BrushConfig, settings: EngineSettings) -> Self {
        let brush = match brush.validate() {
            Ok(()) => brush,
            Err(err) => {
                warn!("{}; using default brush", err);
                BrushConfig::default()
            }
        };
        Self {
            state: EngineState::NotReady,
            canvas: None,
            brush,
            settings,
            transform: AffineTransform::IDENTITY,
            inverse: Some(AffineTransform::IDENTITY),
            transform_degraded: false,
            visible: None,
            last_sample: None,
            first_touch: true,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state != EngineState::NotReady
    }

    pub fn brush(&self) -> BrushConfig {
        self.brush
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// True while a singular transform forces identity mapping.
    pub fn is_transform_degraded(&self) -> bool {
        self.transform_degraded
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.canvas.as_ref().map(|c| &c.source)
    }

    pub fn raster(&self) -> Option<&RasterBuffer> {
        self.canvas.as_ref().map(|c| &c.raster)
    }

    pub fn last_sample(&self) -> Option<TouchSample> {
        self.last_sample
    }

    /// Binds a source image and allocates a fresh raster for it.
    ///
    /// `None` is ignored: an engine that was never bound stays `NotReady`.
    pub fn bind_image(&mut self, image: Option<SourceImage>, transform: AffineTransform) {
        let Some(source) = image else {
            debug!("bind_image called without an image; ignoring");
            return;
        };

        let (width, height) = self.raster_size_for(&source);
        info!(
            "Bound {}x{} source image ({}x{} raster)",
            source.width(),
            source.height(),
            width,
            height
        );
        self.canvas = Some(Canvas {
            source,
            raster: RasterBuffer::new(width, height),
        });
        self.state = EngineState::Ready;
        self.first_touch = true;
        self.last_sample = None;
        self.visible = None;
        let _ = self.set_transform(transform);
    }

    /// Installs a new image-to-view transform and re-derives its inverse.
    ///
    /// A singular transform is reported once, after which pointer mapping
    /// degrades to identity until an invertible transform arrives.
    pub fn set_transform(&mut self, transform: AffineTransform) -> Result<(), PaintError> {
        self.transform = transform;
        match transform.invert() {
            Ok(inverse) => {
                if self.transform_degraded {
                    info!("Transform is invertible again; leaving identity fallback");
                }
                self.inverse = Some(inverse);
                self.transform_degraded = false;
                Ok(())
            }
            Err(err) => {
                if !self.transform_degraded {
                    warn!("{}; falling back to identity mapping", err);
                }
                self.inverse = None;
                self.transform_degraded = true;
                Err(err)
            }
        }
    }

    /// Restricts sampling to an image-space region (the part shown in the view).
    pub fn set_visible_region(&mut self, visible: Option<Rect>) {
        self.visible = visible;
    }

    pub fn visible_region(&self) -> Option<Rect> {
        self.visible
    }

    /// True when an image-space pixel may be painted from pointer input.
    pub(crate) fn is_visible(&self, x: i32, y: i32) -> bool {
        self.visible.is_none_or(|region| region.contains(x, y))
    }

    /// Replaces the brush; an invalid one is rejected and the previous kept.
    pub fn set_brush(&mut self, brush: BrushConfig) -> Result<(), PaintError> {
        if let Err(err) = brush.validate() {
            warn!("{}; keeping previous brush", err);
            return Err(err);
        }
        self.brush = brush;
        Ok(())
    }

    /// Drops all paint, re-allocating the raster at the current bounds.
    pub fn clear(&mut self) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };
        let (width, height) = self.raster_size_for(&canvas.source);
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.raster.clear(width, height);
        }
        self.state = EngineState::Ready;
        debug!("Cleared raster to {}x{}", width, height);
    }

    /// Copy of the painted area without the inset margin.
    pub fn export_final(&self) -> Option<PixelBuffer> {
        let canvas = self.canvas.as_ref()?;
        let inset = self.settings.inset as i32;
        canvas
            .raster
            .export_region(canvas.source.bounds().offset(inset, inset))
    }

    fn raster_size_for(&self, source: &SourceImage) -> (u32, u32) {
        let margin = self.settings.inset.saturating_mul(2);
        (
            source.width().saturating_add(margin),
            source.height().saturating_add(margin),
        )
    }

    /// View-to-image mapping, `None` while degraded to identity.
    pub fn view_to_image(&self) -> Option<AffineTransform> {
        self.inverse
    }

    /// View-to-raster mapping: the inverse transform followed by the inset shift.
    pub fn view_to_raster(&self) -> AffineTransform {
        let inset = self.settings.inset as f64;
        self.inverse
            .unwrap_or(AffineTransform::IDENTITY)
            .translated(inset, inset)
    }

    /// Image pixel under a raster point.
    ///
    /// The inset is removed before rounding so far-off points saturate
    /// instead of overflowing.
    pub(crate) fn raster_to_image(&self, raster_point: Point2D) -> (i32, i32) {
        let inset = self.settings.inset as f64;
        Point2D::new(raster_point.x - inset, raster_point.y - inset).floor_i32()
    }

    /// Zoom used to keep on-screen brush size steady; 1.0 while degraded.
    fn zoom_factor(&self) -> f64 {
        if self.transform_degraded {
            1.0
        } else {
            self.transform.zoom_factor()
        }
    }

    /// `min_radius + speed`, shrunk by the zoom factor when zoomed in.
    pub(crate) fn stroke_radius(&self, speed: i64) -> i32 {
        let min_radius = self.brush.min_radius;
        let radius = min_radius as i64 + speed.clamp(0, MAX_SPEED);
        let zoom = self.zoom_factor();
        let radius = if zoom > 1.0 {
            ((radius as f64 / zoom).floor() as i64).max(min_radius as i64)
        } else {
            radius
        };
        i32::try_from(radius).unwrap_or(i32::MAX)
    }

    /// `base_alpha + (100 - 2 * speed)`, clamped to 0-255.
    pub(crate) fn stroke_alpha(&self, speed: i64) -> u8 {
        let speed = speed.clamp(0, MAX_SPEED) as i32;
        util::clamp(self.brush.base_alpha + (100 - 2 * speed), 0, 255) as u8
    }

    /// Samples the source under a raster point and stamps the current brush.
    ///
    /// # Errors
    /// - [`PaintError::NotReady`] before an image is bound
    /// - [`PaintError::OutOfBounds`] when the point misses the image
    pub(crate) fn paint_at<R: Rng + ?Sized>(
        &mut self,
        raster_point: Point2D,
        speed: i64,
        rng: &mut R,
    ) -> Result<StrokeDab, PaintError> {
        let radius = self.stroke_radius(speed);
        let alpha = self.stroke_alpha(speed);
        let shape = self.brush.shape;
        let splatter_count = self.settings.splatter_count;
        let inset = self.settings.inset as i32;
        let (x, y) = self.raster_to_image(raster_point);

        let canvas = self.canvas.as_mut().ok_or(PaintError::NotReady)?;
        if !canvas.source.contains(x, y) {
            trace!("Dropping dab at image ({}, {}): out of bounds", x, y);
            return Err(PaintError::OutOfBounds {
                x,
                y,
                width: canvas.source.width(),
                height: canvas.source.height(),
            });
        }
        let color = canvas.source.sample(x, y)?;
        let (rx, ry) = (x.saturating_add(inset), y.saturating_add(inset));

        let damage = match shape {
            BrushShape::Circle => canvas
                .raster
                .draw_filled_circle(rx, ry, radius, color, alpha),
            BrushShape::Square => canvas
                .raster
                .draw_filled_square(rx, ry, radius, color, alpha),
            BrushShape::CircleSplatter => canvas.raster.draw_splatter(
                rx,
                ry,
                radius,
                color,
                alpha,
                splatter_count,
                rng,
            ),
        };

        Ok(StrokeDab {
            x,
            y,
            radius,
            alpha,
            color,
            shape,
            damage,
        })
    }
}
