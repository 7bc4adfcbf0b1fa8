//! 2D affine mapping between view space and image space.

use crate::error::PaintError;
use serde::{Deserialize, Serialize};

/// Determinants with a magnitude below this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-9;

/// A device, view, or image coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        crate::util::distance(self.x, self.y, other.x, other.y)
    }

    /// Pixel cell containing this point, saturating at the `i32` range.
    pub fn floor_i32(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}

/// Affine transform stored as the top two rows of a 3x3 matrix.
///
/// ```text
/// | scale_x  skew_x   trans_x |
/// | skew_y   scale_y  trans_y |
/// |   0        0        1     |
/// ```
///
/// `apply` maps `x' = scale_x * x + skew_x * y + trans_x` and
/// `y' = skew_y * x + scale_y * y + trans_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub scale_x: f64,
    pub skew_x: f64,
    pub trans_x: f64,
    pub skew_y: f64,
    pub scale_y: f64,
    pub trans_y: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        scale_x: 1.0,
        skew_x: 0.0,
        trans_x: 0.0,
        skew_y: 0.0,
        scale_y: 1.0,
        trans_y: 0.0,
    };

    pub const fn new(
        scale_x: f64,
        skew_x: f64,
        trans_x: f64,
        skew_y: f64,
        scale_y: f64,
        trans_y: f64,
    ) -> Self {
        Self {
            scale_x,
            skew_x,
            trans_x,
            skew_y,
            scale_y,
            trans_y,
        }
    }

    /// Builds a transform from a row-major 3x3 matrix; the perspective row is ignored.
    pub fn from_values(values: [f64; 9]) -> Self {
        Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        )
    }

    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    pub fn determinant(&self) -> f64 {
        self.scale_x * self.scale_y - self.skew_x * self.skew_y
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::IDENTITY, SINGULAR_EPSILON)
    }

    /// Maps a point through this transform.
    pub fn apply(&self, p: Point2D) -> Point2D {
        Point2D {
            x: self.scale_x * p.x + self.skew_x * p.y + self.trans_x,
            y: self.skew_y * p.x + self.scale_y * p.y + self.trans_y,
        }
    }

    /// Returns the inverse mapping.
    ///
    /// # Errors
    /// [`PaintError::NotInvertibleTransform`] when the determinant is (near) zero.
    pub fn invert(&self) -> Result<AffineTransform, PaintError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(PaintError::NotInvertibleTransform { determinant: det });
        }

        Ok(AffineTransform {
            scale_x: self.scale_y / det,
            skew_x: -self.skew_x / det,
            trans_x: (self.skew_x * self.trans_y - self.scale_y * self.trans_x) / det,
            skew_y: -self.skew_y / det,
            scale_y: self.scale_x / det,
            trans_y: (self.skew_y * self.trans_x - self.scale_x * self.trans_y) / det,
        })
    }

    /// Matrix product `self * other`: `other` is applied first.
    pub fn concat(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            scale_x: self.scale_x * other.scale_x + self.skew_x * other.skew_y,
            skew_x: self.scale_x * other.skew_x + self.skew_x * other.scale_y,
            trans_x: self.scale_x * other.trans_x + self.skew_x * other.trans_y + self.trans_x,
            skew_y: self.skew_y * other.scale_x + self.scale_y * other.skew_y,
            scale_y: self.skew_y * other.skew_x + self.scale_y * other.scale_y,
            trans_y: self.skew_y * other.trans_x + self.scale_y * other.trans_y + self.trans_y,
        }
    }

    /// Pre-multiplies by a translation, so the offset is applied after this mapping.
    ///
    /// Used to shift image-space coordinates into a raster that carries an inset margin.
    pub fn translated(&self, dx: f64, dy: f64) -> AffineTransform {
        AffineTransform::translation(dx, dy).concat(self)
    }

    /// Horizontal zoom factor (length of the mapped x basis vector).
    pub fn zoom_factor(&self) -> f64 {
        (self.scale_x * self.scale_x + self.skew_y * self.skew_y).sqrt()
    }

    pub fn approx_eq(&self, other: &AffineTransform, tolerance: f64) -> bool {
        (self.scale_x - other.scale_x).abs() <= tolerance
            && (self.skew_x - other.skew_x).abs() <= tolerance
            && (self.trans_x - other.trans_x).abs() <= tolerance
            && (self.skew_y - other.skew_y).abs() <= tolerance
            && (self.scale_y - other.scale_y).abs() <= tolerance
            && (self.trans_y - other.trans_y).abs() <= tolerance
    }
}
