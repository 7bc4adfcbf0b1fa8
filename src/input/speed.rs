//! Pointer speed estimation from two consecutive samples.

use super::events::TouchSample;
use crate::draw::Point2D;

/// Scales pixel distance so that slow drags produce speeds in the tens.
pub const DISTANCE_SCALE: f64 = 10.0;

/// Converts two (position, time) samples into a scalar speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedEstimator;

impl SpeedEstimator {
    /// `10 * distance(p1, p2) / (t1 - t2)`, truncated toward zero.
    ///
    /// Identical timestamps return the scaled distance unnormalized instead of
    /// dividing by zero, so a zero-length, zero-time pair yields 0.
    ///
    /// The time delta is taken in `i128`, so any pair of timestamps is valid
    /// and the result saturates at the `i64` range.
    pub fn estimate(p1: Point2D, t1: i64, p2: Point2D, t2: i64) -> i64 {
        let scaled = DISTANCE_SCALE * p1.distance_to(&p2);
        let speed = if t1 != t2 {
            scaled / (t1 as i128 - t2 as i128) as f64
        } else {
            scaled
        };
        speed.trunc() as i64
    }

    /// Speed from `previous` to `current`.
    pub fn between(current: &TouchSample, previous: &TouchSample) -> i64 {
        Self::estimate(
            current.point,
            current.timestamp_ms,
            previous.point,
            previous.timestamp_ms,
        )
    }
}
