use crate::error::PaintError;
use crate::input::events::{PointerAction, PointerEvent, TouchSample};
use crate::input::speed::SpeedEstimator;
use log::trace;
use rand::Rng;

use super::{EngineState, StrokeDab, StrokeEngine};

impl StrokeEngine {
    /// Routes a raw pointer event to the matching handler.
    ///
    /// Events reporting two or more contacts are left to the host (pinch/pan)
    /// and never touch the raster. Every event is a no-op until an image is bound.
    ///
    /// # Returns
    /// The dab that was painted, if any.
    pub fn handle_event<R: Rng + ?Sized>(
        &mut self,
        event: &PointerEvent,
        rng: &mut R,
    ) -> Option<StrokeDab> {
        if event.is_multi_touch() {
            trace!("Ignoring {:?} with {} contacts", event.action, event.contacts);
            return None;
        }
        match event.action {
            PointerAction::Down => self.pointer_down(event.sample(), rng),
            PointerAction::Move => self.pointer_move(event.sample(), rng),
            PointerAction::Up => {
                self.pointer_up();
                None
            }
        }
    }

    /// Starts contact.
    ///
    /// The first contact after binding only primes the previous sample; later
    /// contacts paint immediately, measuring speed from the last sample seen.
    pub fn pointer_down<R: Rng + ?Sized>(
        &mut self,
        sample: TouchSample,
        rng: &mut R,
    ) -> Option<StrokeDab> {
        if self.state == EngineState::NotReady {
            return None;
        }
        self.state = EngineState::Dragging;

        if self.first_touch || self.last_sample.is_none() {
            self.first_touch = false;
            self.last_sample = Some(sample);
            return None;
        }
        self.stroke(sample, rng)
    }

    /// Paints at the new position while a contact is active.
    ///
    /// Moves without an active contact (hover) are ignored.
    pub fn pointer_move<R: Rng + ?Sized>(
        &mut self,
        sample: TouchSample,
        rng: &mut R,
    ) -> Option<StrokeDab> {
        if self.state != EngineState::Dragging {
            return None;
        }
        self.stroke(sample, rng)
    }

    /// Ends contact. Leaves the raster untouched.
    pub fn pointer_up(&mut self) {
        if self.state == EngineState::Dragging {
            self.state = EngineState::Ready;
        }
    }

    /// Maps a sample into the raster, derives speed, and stamps one dab.
    ///
    /// The previous sample is replaced even when the dab is dropped, so the
    /// next speed measures real pointer travel.
    fn stroke<R: Rng + ?Sized>(&mut self, sample: TouchSample, rng: &mut R) -> Option<StrokeDab> {
        let previous = self.last_sample.unwrap_or(sample);
        let speed = SpeedEstimator::between(&sample, &previous);
        let raster_point = self.view_to_raster().apply(sample.point);
        let (x, y) = self.raster_to_image(raster_point);

        let result = if self.is_visible(x, y) {
            self.paint_at(raster_point, speed, rng)
        } else {
            trace!("Dropping dab outside the visible region");
            Err(PaintError::OutOfBounds {
                x,
                y,
                width: self.source().map_or(0, |s| s.width()),
                height: self.source().map_or(0, |s| s.height()),
            })
        };
        self.last_sample = Some(sample);

        match result {
            Ok(dab) => Some(dab),
            Err(PaintError::OutOfBounds { .. }) | Err(PaintError::NotReady) => None,
            Err(err) => {
                log::warn!("Stroke dropped: {}", err);
                None
            }
        }
    }
}
