//! Rendering primitives for the painting core.
//!
//! This module defines the pixel-level types strokes are made of:
//! - [`Color`]: 8-bit RGBA color with source-over blending
//! - [`AffineTransform`] and [`Point2D`]: view-to-image coordinate mapping
//! - [`SourceImage`]: the photograph colors are sampled from
//! - [`RasterBuffer`] / [`PixelBuffer`]: the off-screen canvas and its exports
//! - [`BrushConfig`]: brush shape, minimum radius, and base opacity
//! - [`DirtyTracker`]: damage accumulation for incremental repaints

pub mod brush;
pub mod color;
pub mod dirty;
pub mod raster;
pub mod source;
pub mod transform;

// Re-export commonly used types at module level
pub use brush::{BrushConfig, BrushShape};
pub use color::Color;
pub use dirty::DirtyTracker;
pub use raster::{PixelBuffer, RasterBuffer};
pub use source::SourceImage;
pub use transform::{AffineTransform, Point2D};

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, RED, TRANSPARENT, WHITE};
