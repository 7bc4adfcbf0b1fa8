//! Geometry helpers shared by the raster, the engine, and the host.
//!
//! This module provides:
//! - [`Rect`]: integer axis-aligned rectangle used for bounds, crops, and damage
//! - Letterbox geometry for an image centered inside a view
//! - Small numeric helpers

// ============================================================================
// Numeric Helpers
// ============================================================================

/// Clamps a value to a specified range.
pub fn clamp(val: i32, min: i32, max: i32) -> i32 {
    if val < min {
        min
    } else if val > max {
        max
    } else {
        val
    }
}

/// Euclidean distance between two points.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt()
}

// ============================================================================
// Rectangles
// ============================================================================

/// Axis-aligned rectangle with inclusive min and exclusive max edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let width = max_x.saturating_sub(min_x);
        let height = max_y.saturating_sub(min_y);
        Self::new(min_x, min_y, width, height)
    }

    /// Square of side `2 * radius` centered on (`cx`, `cy`).
    pub fn centered(cx: i32, cy: i32, radius: i32) -> Option<Self> {
        Self::from_min_max(
            cx.saturating_sub(radius),
            cy.saturating_sub(radius),
            cx.saturating_add(radius),
            cy.saturating_add(radius),
        )
    }

    pub fn max_x(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn max_y(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns true when (`x`, `y`) lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }

    /// Overlapping area of two rectangles, if any.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        Rect::from_min_max(
            self.x.max(other.x),
            self.y.max(other.y),
            self.max_x().min(other.max_x()),
            self.max_y().min(other.max_y()),
        )
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        Rect {
            x: min_x,
            y: min_y,
            width: self.max_x().max(other.max_x()).saturating_sub(min_x),
            height: self.max_y().max(other.max_y()).saturating_sub(min_y),
        }
    }

    /// Moves the rectangle by (`dx`, `dy`).
    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }
}

/// Calculates where a scaled image sits when centered inside a view.
///
/// Mirrors how an image widget letterboxes its content: the image is scaled by
/// (`scale_x`, `scale_y`) and centered, so any leftover space is split evenly
/// on both sides. The returned rectangle is in view coordinates and may extend
/// past the view when the scaled image is larger than it.
///
/// # Arguments
/// * `image_width` / `image_height` - Intrinsic image size in pixels
/// * `view_width` / `view_height` - Size of the hosting view
/// * `scale_x` / `scale_y` - Scale applied to the image when displayed
///
/// # Returns
/// `None` when the scaled image has no area.
pub fn displayed_bounds(
    image_width: u32,
    image_height: u32,
    view_width: u32,
    view_height: u32,
    scale_x: f64,
    scale_y: f64,
) -> Option<Rect> {
    let width_actual = (image_width as f64 * scale_x).round() as i32;
    let height_actual = (image_height as f64 * scale_y).round() as i32;

    let top = (view_height as i32 - height_actual) / 2;
    let left = (view_width as i32 - width_actual) / 2;

    Rect::new(left, top, width_actual, height_actual)
}
