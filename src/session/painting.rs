//! The painting session aggregate handed to the host.

use crate::config::Config;
use crate::draw::{AffineTransform, BrushConfig, DirtyTracker, PixelBuffer, Point2D, SourceImage};
use crate::error::PaintError;
use crate::input::{EngineSettings, PointerEvent, StrokeEngine};
use crate::util::Rect;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Holds the source image, raster, brush, and transform for one painting.
///
/// All mutation goes through `&mut self`; the host drives it from a single
/// thread and only ever hands copies ([`PixelBuffer`]) to background workers.
#[derive(Debug)]
pub struct PaintingSession {
    engine: StrokeEngine,
    dirty: DirtyTracker,
    rng: StdRng,
    transform: AffineTransform,
    view_size: Option<(u32, u32)>,
}

impl Default for PaintingSession {
    fn default() -> Self {
        Self::new(BrushConfig::default(), EngineSettings::default(), None)
    }
}

impl PaintingSession {
    /// Creates an empty session. `seed` makes splatter and auto-paint reproducible.
    pub fn new(brush: BrushConfig, settings: EngineSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            engine: StrokeEngine::new(brush, settings),
            dirty: DirtyTracker::new(),
            rng,
            transform: AffineTransform::IDENTITY,
            view_size: None,
        }
    }

    /// Builds a session from the `[brush]` and `[engine]` config sections.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.brush.to_brush_config(),
            config.engine.to_engine_settings(),
            config.engine.seed,
        )
    }

    pub fn engine(&self) -> &StrokeEngine {
        &self.engine
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Loads a decoded bitmap, cropped to the region that is actually visible.
    ///
    /// Replaces any previous image and starts from an empty raster.
    ///
    /// # Errors
    /// [`PaintError::InvalidImage`] when the crop has no area; the previous
    /// image (if any) stays bound.
    pub fn load_image(
        &mut self,
        bitmap: &PixelBuffer,
        visible: Option<Rect>,
    ) -> Result<(), PaintError> {
        let source = match visible {
            Some(region) => SourceImage::from_visible_region(bitmap, region)?,
            None => SourceImage::new(bitmap.clone())?,
        };
        info!("Loading {}x{} image", source.width(), source.height());
        self.engine.bind_image(Some(source), self.transform);
        self.refresh_visible_region();
        self.dirty.mark_raster();
        Ok(())
    }

    /// Size of the host view, used to work out which part of the image is on screen.
    pub fn set_view_size(&mut self, width: u32, height: u32) {
        self.view_size = Some((width, height));
        self.refresh_visible_region();
    }

    /// Installs the host's image-to-view transform.
    ///
    /// A singular transform is accepted (painting continues with identity
    /// mapping) and reported through the returned error.
    pub fn set_transform(&mut self, transform: AffineTransform) -> Result<(), PaintError> {
        self.transform = transform;
        let result = self.engine.set_transform(transform);
        self.refresh_visible_region();
        result
    }

    /// Switches brush; an invalid brush is rejected and the current one kept.
    pub fn set_brush(&mut self, brush: BrushConfig) -> Result<(), PaintError> {
        self.engine.set_brush(brush)
    }

    pub fn brush(&self) -> BrushConfig {
        self.engine.brush()
    }

    /// Erases the painting.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.dirty.mark_raster();
    }

    /// Dabs the whole image on a jittered grid. Returns the number of dabs.
    pub fn auto_paint(&mut self) -> usize {
        let report = self.engine.auto_paint(&mut self.rng);
        if !report.dabs.is_empty() {
            self.dirty.mark_raster();
        }
        report.dabs.len()
    }

    /// Feeds one pointer event to the engine. Returns true when paint was applied.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        match self.engine.handle_event(event, &mut self.rng) {
            Some(dab) => {
                self.dirty.mark_dab(dab.damage);
                true
            }
            None => false,
        }
    }

    /// Copy of the painting, trimmed to the image bounds.
    pub fn export_final(&self) -> Option<PixelBuffer> {
        self.engine.export_final()
    }

    /// Raster areas changed since the last call, in raster coordinates.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        let (width, height) = self
            .engine
            .raster()
            .map_or((0, 0), |r| (r.width() as i32, r.height() as i32));
        self.dirty.take_regions(width, height)
    }

    /// Maps the view rectangle back into the image and keeps the overlap.
    fn refresh_visible_region(&mut self) {
        let region = match (self.view_size, self.engine.view_to_image(), self.engine.source()) {
            (Some((width, height)), Some(inverse), Some(source)) => {
                let corners = [
                    Point2D::new(0.0, 0.0),
                    Point2D::new(width as f64, 0.0),
                    Point2D::new(0.0, height as f64),
                    Point2D::new(width as f64, height as f64),
                ]
                .map(|p| inverse.apply(p));

                let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
                let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
                let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
                let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

                Rect::from_min_max(
                    min_x.floor() as i32,
                    min_y.floor() as i32,
                    max_x.ceil() as i32,
                    max_y.ceil() as i32,
                )
                .and_then(|view| view.intersect(&source.bounds()))
            }
            _ => None,
        };
        debug!("Visible image region: {:?}", region);
        self.engine.set_visible_region(region);
    }
}
