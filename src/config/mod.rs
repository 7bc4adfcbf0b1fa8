//! Configuration file support for impressionist.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/impressionist/config.toml`. Settings cover the starting brush,
//! raster and auto-paint tuning, and where finished paintings are saved.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

pub use types::{BrushSection, EngineSection, ExportFormat, ExportSection};

use crate::draw::brush::MAX_MIN_RADIUS;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// All fields have defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [brush]
/// shape = "circle-splatter"
/// min_radius = 5
/// base_alpha = 150
///
/// [engine]
/// inset = 20
/// auto_paint_step = 10
///
/// [export]
/// save_directory = "~/Pictures/Impressionist"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Starting brush
    #[serde(default)]
    pub brush: BrushSection,

    /// Raster layout and auto-paint tuning
    #[serde(default)]
    pub engine: EngineSection,

    /// Save location and file naming
    #[serde(default)]
    pub export: ExportSection,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `brush.min_radius`: 1 - 200
    /// - `brush.base_alpha`: 0 - 255
    /// - `engine.inset`: 0 - 500
    /// - `engine.auto_paint_step`: 1 - 500
    /// - `engine.auto_paint_jitter`: 0 - 100
    /// - `engine.auto_paint_max_speed`: 0 - 1000
    /// - `engine.splatter_count`: 1 - 64
    pub fn validate_and_clamp(&mut self) {
        if !(1..=MAX_MIN_RADIUS).contains(&self.brush.min_radius) {
            log::warn!(
                "Invalid min_radius {}, clamping to 1-{} range",
                self.brush.min_radius,
                MAX_MIN_RADIUS
            );
            self.brush.min_radius = self.brush.min_radius.clamp(1, MAX_MIN_RADIUS);
        }

        if !(0..=255).contains(&self.brush.base_alpha) {
            log::warn!(
                "Invalid base_alpha {}, clamping to 0-255 range",
                self.brush.base_alpha
            );
            self.brush.base_alpha = self.brush.base_alpha.clamp(0, 255);
        }

        if self.engine.inset > 500 {
            log::warn!(
                "Invalid inset {}, clamping to 0-500 range",
                self.engine.inset
            );
            self.engine.inset = 500;
        }

        if !(1..=500).contains(&self.engine.auto_paint_step) {
            log::warn!(
                "Invalid auto_paint_step {}, clamping to 1-500 range",
                self.engine.auto_paint_step
            );
            self.engine.auto_paint_step = self.engine.auto_paint_step.clamp(1, 500);
        }

        if !(0..=100).contains(&self.engine.auto_paint_jitter) {
            log::warn!(
                "Invalid auto_paint_jitter {}, clamping to 0-100 range",
                self.engine.auto_paint_jitter
            );
            self.engine.auto_paint_jitter = self.engine.auto_paint_jitter.clamp(0, 100);
        }

        if !(0..=1000).contains(&self.engine.auto_paint_max_speed) {
            log::warn!(
                "Invalid auto_paint_max_speed {}, clamping to 0-1000 range",
                self.engine.auto_paint_max_speed
            );
            self.engine.auto_paint_max_speed = self.engine.auto_paint_max_speed.clamp(0, 1000);
        }

        if !(1..=64).contains(&self.engine.splatter_count) {
            log::warn!(
                "Invalid splatter_count {}, clamping to 1-64 range",
                self.engine.splatter_count
            );
            self.engine.splatter_count = self.engine.splatter_count.clamp(1, 64);
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!("Empty filename_template, using default");
            self.export.filename_template = ExportSection::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/impressionist/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("impressionist");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to the default location.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Serializes the config to TOML and writes it to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::BrushShape;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.brush.shape, BrushShape::Square);
        assert_eq!(config.brush.min_radius, 5);
        assert_eq!(config.brush.base_alpha, 150);
        assert_eq!(config.engine.inset, 20);
        assert_eq!(config.engine.auto_paint_step, 10);
        assert_eq!(config.engine.seed, None);
        assert_eq!(config.export.format, ExportFormat::Png);
        assert_eq!(config.export.save_directory, "~/Pictures/Impressionist");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config: Config = toml::from_str(
            r#"
            [brush]
            min_radius = 0
            base_alpha = 400

            [engine]
            inset = 9000
            auto_paint_step = 0
            splatter_count = 1000

            [export]
            filename_template = "  "
            "#,
        )
        .unwrap();
        config.validate_and_clamp();

        assert_eq!(config.brush.min_radius, 1);
        assert_eq!(config.brush.base_alpha, 255);
        assert_eq!(config.engine.inset, 500);
        assert_eq!(config.engine.auto_paint_step, 1);
        assert_eq!(config.engine.splatter_count, 64);
        assert_eq!(
            config.export.filename_template,
            "impressionist_%Y-%m-%d_%H%M%S"
        );
        assert!(config.brush.to_brush_config().validate().is_ok());
    }

    #[test]
    fn unknown_brush_shape_fails_to_parse() {
        let result: Result<Config, _> = toml::from_str("[brush]\nshape = \"triangle\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.brush.shape = BrushShape::CircleSplatter;
        config.engine.seed = Some(1234);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.brush.shape, BrushShape::CircleSplatter);
        assert_eq!(loaded.engine.seed, Some(1234));
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[brush\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse config"));
    }

    #[test]
    fn schema_lists_all_sections() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = schema.get("properties").unwrap();
        for section in ["brush", "engine", "export"] {
            assert!(properties.get(section).is_some(), "missing {section}");
        }
    }
}
