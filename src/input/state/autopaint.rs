//! One-click "impressionize": dabs the whole image on a jittered grid.

use crate::draw::Point2D;
use crate::util::{self, Rect};
use log::{debug, info};
use rand::Rng;

use super::{StrokeDab, StrokeEngine};

/// Resumable position of an auto-paint sweep.
///
/// Grid points are visited row-major, so a sweep split across several
/// [`StrokeEngine::auto_paint_chunk`] calls covers the image in raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoPaintSweep {
    step: u32,
    columns: u32,
    rows: u32,
    next: u32,
}

impl AutoPaintSweep {
    fn new(width: u32, height: u32, step: u32) -> Self {
        let step = step.max(1);
        Self {
            step,
            columns: width.div_ceil(step),
            rows: height.div_ceil(step),
            next: 0,
        }
    }

    pub fn total_cells(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn remaining(&self) -> u32 {
        self.total_cells() - self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.total_cells()
    }

    /// Grid origin of the next cell, in image coordinates.
    fn next_cell(&mut self) -> Option<(i32, i32)> {
        if self.is_finished() {
            return None;
        }
        let row = self.next / self.columns;
        let col = self.next % self.columns;
        self.next += 1;
        Some(((col * self.step) as i32, (row * self.step) as i32))
    }
}

/// Summary of a completed sweep.
#[derive(Debug, Clone, Default)]
pub struct AutoPaintReport {
    /// Dabs in the order they were stamped
    pub dabs: Vec<StrokeDab>,
    /// Union of the raster areas touched
    pub damage: Option<Rect>,
}

impl StrokeEngine {
    /// Prepares a sweep over the bound image, or `None` when not ready.
    pub fn begin_auto_paint(&self) -> Option<AutoPaintSweep> {
        let source = self.source()?;
        Some(AutoPaintSweep::new(
            source.width(),
            source.height(),
            self.settings.auto_paint_step,
        ))
    }

    /// Paints up to `max_cells` grid cells of a sweep.
    ///
    /// Each cell's origin is jittered by `0..=auto_paint_jitter` on both axes
    /// (kept inside the image) and stamped with a random speed in
    /// `0..=auto_paint_max_speed`, through the same paint routine as pointer moves.
    pub fn auto_paint_chunk<R: Rng + ?Sized>(
        &mut self,
        sweep: &mut AutoPaintSweep,
        max_cells: usize,
        rng: &mut R,
    ) -> Vec<StrokeDab> {
        let Some(bounds) = self.source().map(|s| s.bounds()) else {
            return Vec::new();
        };
        let jitter = self.settings.auto_paint_jitter.max(0);
        let max_speed = self.settings.auto_paint_max_speed.max(0);
        let inset = self.settings.inset as f64;

        let mut dabs = Vec::new();
        for _ in 0..max_cells {
            let Some((gx, gy)) = sweep.next_cell() else {
                break;
            };
            let x = util::clamp(gx + rng.gen_range(0..=jitter), 0, bounds.width - 1);
            let y = util::clamp(gy + rng.gen_range(0..=jitter), 0, bounds.height - 1);
            let speed = rng.gen_range(0..=max_speed) as i64;

            let point = Point2D::new(x as f64 + inset, y as f64 + inset);
            if let Ok(dab) = self.paint_at(point, speed, rng) {
                dabs.push(dab);
            }
        }
        dabs
    }

    /// Runs a full sweep in one call.
    pub fn auto_paint<R: Rng + ?Sized>(&mut self, rng: &mut R) -> AutoPaintReport {
        let Some(mut sweep) = self.begin_auto_paint() else {
            debug!("auto_paint requested before an image was bound");
            return AutoPaintReport::default();
        };
        let total = sweep.total_cells() as usize;
        let dabs = self.auto_paint_chunk(&mut sweep, total, rng);
        let damage = dabs
            .iter()
            .filter_map(|dab| dab.damage)
            .reduce(|acc, rect| acc.union(&rect));

        info!("Auto-paint stamped {} of {} grid cells", dabs.len(), total);
        AutoPaintReport { dabs, damage }
    }
}
