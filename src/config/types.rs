//! Configuration type definitions.

use crate::draw::{BrushConfig, BrushShape};
use crate::input::EngineSettings;
use crate::input::state::DEFAULT_INSET;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Brush used when a session starts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BrushSection {
    /// Dab shape: "circle", "square", or "circle-splatter"
    #[serde(default)]
    pub shape: BrushShape,

    /// Radius of a dab at zero speed (valid range: 1 - 200)
    #[serde(default = "default_min_radius")]
    pub min_radius: i32,

    /// Opacity offset before the speed term (valid range: 0 - 255)
    #[serde(default = "default_base_alpha")]
    pub base_alpha: i32,
}

impl Default for BrushSection {
    fn default() -> Self {
        Self {
            shape: BrushShape::default(),
            min_radius: default_min_radius(),
            base_alpha: default_base_alpha(),
        }
    }
}

impl BrushSection {
    pub fn to_brush_config(&self) -> BrushConfig {
        BrushConfig::new(self.shape, self.min_radius, self.base_alpha)
    }
}

/// Raster layout and auto-paint tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EngineSection {
    /// Transparent margin around the image in the raster (valid range: 0 - 500)
    #[serde(default = "default_inset")]
    pub inset: u32,

    /// Auto-paint grid spacing in image pixels (valid range: 1 - 500)
    #[serde(default = "default_auto_paint_step")]
    pub auto_paint_step: u32,

    /// Maximum random offset added to each auto-paint grid point
    #[serde(default = "default_auto_paint_jitter")]
    pub auto_paint_jitter: i32,

    /// Maximum synthesized speed for auto-paint dabs
    #[serde(default = "default_auto_paint_max_speed")]
    pub auto_paint_max_speed: i32,

    /// Discs per splatter dab (valid range: 1 - 64)
    #[serde(default = "default_splatter_count")]
    pub splatter_count: usize,

    /// Fixed random seed; leave unset for a different painting every run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            inset: default_inset(),
            auto_paint_step: default_auto_paint_step(),
            auto_paint_jitter: default_auto_paint_jitter(),
            auto_paint_max_speed: default_auto_paint_max_speed(),
            splatter_count: default_splatter_count(),
            seed: None,
        }
    }
}

impl EngineSection {
    pub fn to_engine_settings(&self) -> EngineSettings {
        EngineSettings {
            inset: self.inset,
            auto_paint_step: self.auto_paint_step,
            auto_paint_jitter: self.auto_paint_jitter,
            auto_paint_max_speed: self.auto_paint_max_speed,
            splatter_count: self.splatter_count,
        }
    }
}

/// Encoded output format for saved paintings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
        }
    }
}

/// Where and how finished paintings are written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportSection {
    /// Directory for saved paintings; a leading `~` expands to the home directory
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// chrono format string used for file names (extension added automatically)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    #[serde(default)]
    pub format: ExportFormat,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
            format: ExportFormat::default(),
        }
    }
}

fn default_min_radius() -> i32 {
    5
}

fn default_base_alpha() -> i32 {
    150
}

fn default_inset() -> u32 {
    DEFAULT_INSET
}

fn default_auto_paint_step() -> u32 {
    10
}

fn default_auto_paint_jitter() -> i32 {
    5
}

fn default_auto_paint_max_speed() -> i32 {
    10
}

fn default_splatter_count() -> usize {
    crate::draw::raster::DEFAULT_SPLATTER_COUNT
}

fn default_save_directory() -> String {
    "~/Pictures/Impressionist".to_string()
}

fn default_filename_template() -> String {
    "impressionist_%Y-%m-%d_%H%M%S".to_string()
}
