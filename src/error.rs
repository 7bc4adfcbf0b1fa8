//! Error taxonomy for the painting core.
//!
//! None of these are fatal: the engine and session recover from every variant
//! locally (degrade, drop the stroke, or ignore the event).

use thiserror::Error;

/// Errors raised by core painting operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaintError {
    /// The supplied transform has a (near) zero determinant.
    #[error("transform is not invertible (determinant {determinant})")]
    NotInvertibleTransform { determinant: f64 },

    /// A coordinate fell outside the addressed pixel grid.
    #[error("point ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// No source image has been bound yet.
    #[error("no source image bound")]
    NotReady,

    /// Brush settings rejected; the previous brush stays active.
    #[error("invalid brush configuration: {0}")]
    InvalidBrushConfig(String),

    /// Pixel data does not match the declared dimensions, or has no area.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}
