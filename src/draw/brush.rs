//! Brush shape selection and per-stroke brush settings.

use crate::error::PaintError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted `min_radius`.
pub const MAX_MIN_RADIUS: i32 = 200;

/// Shape stamped at every processed pointer sample.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BrushShape {
    /// Filled disc of the stroke radius
    Circle,
    /// Filled axis-aligned square of side `2 * radius`
    #[default]
    Square,
    /// A handful of small discs scattered around the sample point
    CircleSplatter,
}

impl fmt::Display for BrushShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrushShape::Circle => "circle",
            BrushShape::Square => "square",
            BrushShape::CircleSplatter => "circle-splatter",
        };
        f.write_str(name)
    }
}

impl FromStr for BrushShape {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "circle" => Ok(BrushShape::Circle),
            "square" => Ok(BrushShape::Square),
            "circle-splatter" | "splatter" => Ok(BrushShape::CircleSplatter),
            other => Err(PaintError::InvalidBrushConfig(format!(
                "unknown brush shape '{other}'"
            ))),
        }
    }
}

/// Brush settings chosen by the user between strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushConfig {
    pub shape: BrushShape,
    /// Radius used for a motionless stroke; speed only grows it
    pub min_radius: i32,
    /// Opacity baseline before the speed adjustment, 0-255
    pub base_alpha: i32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            shape: BrushShape::Square,
            min_radius: 5,
            base_alpha: 150,
        }
    }
}

impl BrushConfig {
    pub fn new(shape: BrushShape, min_radius: i32, base_alpha: i32) -> Self {
        Self {
            shape,
            min_radius,
            base_alpha,
        }
    }

    /// Checks `min_radius` in `1..=MAX_MIN_RADIUS` and `base_alpha` in `0..=255`.
    pub fn validate(&self) -> Result<(), PaintError> {
        if !(1..=MAX_MIN_RADIUS).contains(&self.min_radius) {
            return Err(PaintError::InvalidBrushConfig(format!(
                "min_radius must be within 1-{}, got {}",
                MAX_MIN_RADIUS, self.min_radius
            )));
        }
        if !(0..=255).contains(&self.base_alpha) {
            return Err(PaintError::InvalidBrushConfig(format!(
                "base_alpha must be within 0-255, got {}",
                self.base_alpha
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_brush_is_valid() {
        let brush = BrushConfig::default();
        assert!(brush.validate().is_ok());
        assert_eq!(brush.shape, BrushShape::Square);
    }

    #[test]
    fn rejects_non_positive_radius_and_bad_alpha() {
        assert!(BrushConfig::new(BrushShape::Circle, 0, 100).validate().is_err());
        assert!(BrushConfig::new(BrushShape::Circle, 3, 256).validate().is_err());
        assert!(BrushConfig::new(BrushShape::Circle, 3, -1).validate().is_err());
        assert!(BrushConfig::new(BrushShape::Circle, 1, 255).validate().is_ok());
    }

    #[test]
    fn rejects_radius_above_maximum() {
        let at_max = BrushConfig::new(BrushShape::Square, MAX_MIN_RADIUS, 150);
        assert!(at_max.validate().is_ok());

        let err = BrushConfig::new(BrushShape::Square, i32::MAX, 150)
            .validate()
            .unwrap_err();
        assert!(matches!(err, PaintError::InvalidBrushConfig(ref msg) if msg.contains("1-200")));
    }

    #[test]
    fn shape_names_parse_and_display() {
        for shape in [
            BrushShape::Circle,
            BrushShape::Square,
            BrushShape::CircleSplatter,
        ] {
            assert_eq!(shape.to_string().parse::<BrushShape>().unwrap(), shape);
        }
        assert_eq!(
            "Splatter".parse::<BrushShape>().unwrap(),
            BrushShape::CircleSplatter
        );
        assert!("triangle".parse::<BrushShape>().is_err());
    }
}
