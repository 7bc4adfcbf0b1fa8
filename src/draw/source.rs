//! Read-only photograph that strokes sample their color from.

use super::color::Color;
use super::raster::PixelBuffer;
use crate::error::PaintError;
use crate::util::Rect;

/// Immutable pixel grid cropped to the region that is actually displayed.
///
/// Replaced wholesale when a new image is loaded, never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    pixels: PixelBuffer,
}

impl SourceImage {
    /// Wraps an already-cropped bitmap.
    ///
    /// # Errors
    /// [`PaintError::InvalidImage`] for a bitmap with no area.
    pub fn new(pixels: PixelBuffer) -> Result<Self, PaintError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(PaintError::InvalidImage(format!(
                "image has no area ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Crops a decoded bitmap to its visible region.
    ///
    /// `visible` is in bitmap pixel coordinates; the part outside the bitmap
    /// (letterbox padding) is discarded so it can never be sampled.
    pub fn from_visible_region(bitmap: &PixelBuffer, visible: Rect) -> Result<Self, PaintError> {
        let cropped = bitmap.crop(visible).ok_or_else(|| {
            PaintError::InvalidImage(format!(
                "visible region {:?} does not overlap the {}x{} bitmap",
                visible,
                bitmap.width(),
                bitmap.height()
            ))
        })?;
        Self::new(cropped)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width() as i32,
            height: self.height() as i32,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.pixels.in_bounds(x, y)
    }

    /// Color at an integer pixel coordinate.
    ///
    /// # Errors
    /// [`PaintError::OutOfBounds`] outside `[0, width) x [0, height)`.
    pub fn sample(&self, x: i32, y: i32) -> Result<Color, PaintError> {
        self.pixels.get(x, y).ok_or(PaintError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }
}
