//! Pointer input handling and the stroke engine state machine.
//!
//! This module translates host pointer events into brush dabs. It tracks the
//! previous touch sample for speed estimation, maps view coordinates into the
//! image through the inverse transform, and drives the
//! `NotReady -> Ready -> Dragging` lifecycle.

pub mod events;
pub mod speed;
pub mod state;

// Re-export commonly used types at module level
pub use events::{PointerAction, PointerEvent, TouchSample};
pub use speed::SpeedEstimator;
pub use state::{
    AutoPaintReport, AutoPaintSweep, EngineSettings, EngineState, StrokeDab, StrokeEngine,
};
