//! Export configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the upload (source) directory and is layered on top of the stock
//! defaults: tables merge key by key, arrays (including `[[presets]]`)
//! replace the default wholesale.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [export]
//! filter = "triangle"        # nearest | triangle | catmull-rom | gaussian | lanczos3
//! max_pixels = 100000000     # Largest surface the rasterizer will allocate
//! compression = "deflated"   # Zip entry compression: deflated | stored
//!
//! [menu]
//! offset_x = 10.0            # Menu distance right of its anchor, in pixels
//!
//! [processing]
//! max_processes = 4          # Max parallel exports (omit for auto = CPU cores)
//!
//! [[presets]]                # Replaces the whole stock catalog when present
//! id = "original"
//! label = "Original Size"
//!
//! [[presets]]
//! id = "icon"
//! label = "Icon (64×64)"
//! width = 64
//! height = 64
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::archive::ArchiveCompression;
use crate::catalog::{SizePreset, default_presets};
use crate::export::ExportOptions;
use crate::imaging::{DEFAULT_MAX_PIXELS, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Drawing and archiving settings.
    pub export: ExportConfig,
    /// Floating download menu placement.
    pub menu: MenuConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Size catalog, in display order.
    pub presets: Vec<SizePreset>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export: ExportConfig::default(),
            menu: MenuConfig::default(),
            processing: ProcessingConfig::default(),
            presets: default_presets(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "export.max_pixels must be non-zero".into(),
            ));
        }
        if self.presets.is_empty() {
            return Err(ConfigError::Validation(
                "presets must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for preset in &self.presets {
            if preset.id.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "preset ids must not be empty".into(),
                ));
            }
            if !seen.insert(preset.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate preset id: {}",
                    preset.id
                )));
            }
            match (preset.width, preset.height) {
                (Some(0), _) | (_, Some(0)) => {
                    return Err(ConfigError::Validation(format!(
                        "preset {} must have non-zero width and height",
                        preset.id
                    )));
                }
                (Some(_), None) | (None, Some(_)) => {
                    return Err(ConfigError::Validation(format!(
                        "preset {} must set both width and height, or neither",
                        preset.id
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            filter: self.export.filter,
            max_pixels: self.export.max_pixels,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Resampling filter for stretching onto the surface.
    pub filter: ResampleFilter,
    /// Surfaces larger than this many pixels are refused.
    pub max_pixels: u64,
    /// Zip entry compression for "download all".
    pub compression: ArchiveCompression,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            max_pixels: DEFAULT_MAX_PIXELS,
            compression: ArchiveCompression::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Horizontal gap between the anchor's right edge and the menu.
    pub offset_x: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self { offset_x: 10.0 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of items exported at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up), at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock default config as a `toml::Value::Table`, the base layer for
/// merging user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(load_raw_config(dir)?)
}

/// A fully-commented stock `config.toml`. Used by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r##"# batch-export configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the upload directory (--source).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Resampling filter used when stretching an image to a preset size.
# One of: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "triangle"

# Largest drawing surface, in pixels. Exports needing a bigger surface fail
# with "No drawing surface available".
max_pixels = 100000000

# Zip entry compression for download-all: deflated or stored.
compression = "deflated"

# ---------------------------------------------------------------------------
# Download menu
# ---------------------------------------------------------------------------
[menu]
# Gap between the download button's right edge and the floating menu.
offset_x = 10.0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum items exported in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Size presets
# ---------------------------------------------------------------------------
# Defining any [[presets]] replaces the whole list below.
# Omit width/height to keep the source's own size.

[[presets]]
id = "original"
label = "Original Size"

[[presets]]
id = "icon-small"
label = "Icon (32×32)"
width = 32
height = 32

[[presets]]
id = "icon"
label = "Icon (64×64)"
width = 64
height = 64

[[presets]]
id = "thumbnail"
label = "Thumbnail (150×150)"
width = 150
height = 150

[[presets]]
id = "small"
label = "Small (320×240)"
width = 320
height = 240

[[presets]]
id = "medium"
label = "Medium (640×480)"
width = 640
height = 480

[[presets]]
id = "large"
label = "Large (1024×768)"
width = 1024
height = 768

[[presets]]
id = "hd"
label = "HD (1280×720)"
width = 1280
height = 720

[[presets]]
id = "full-hd"
label = "Full HD (1920×1080)"
width = 1920
height = 1080

[[presets]]
id = "square"
label = "Square (1080×1080)"
width = 1080
height = 1080
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.export.filter, ResampleFilter::Triangle);
        assert_eq!(config.menu.offset_x, 10.0);
        assert_eq!(config.presets, default_presets());
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let parsed: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(parsed)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[export]\nfilter = \"lanczos3\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.export.filter, ResampleFilter::Lanczos3);
        assert_eq!(config.export.max_pixels, DEFAULT_MAX_PIXELS);
        assert_eq!(config.presets, default_presets());
    }

    #[test]
    fn presets_replace_catalog_wholesale() {
        let overlay: toml::Value = toml::from_str(
            r#"
            [[presets]]
            id = "banner"
            label = "Banner"
            width = 728
            height = 90
            "#,
        )
        .unwrap();

        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.presets.len(), 1);
        assert_eq!(config.presets[0].target_size(), Some((728, 90)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let overlay: toml::Value = toml::from_str("[export]\nquality = 90\n").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_toml_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[export\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn half_specified_preset_is_invalid() {
        let mut config = AppConfig::default();
        config.presets = vec![SizePreset {
            id: "wide".into(),
            label: "Wide".into(),
            width: Some(100),
            height: None,
        }];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_sized_preset_is_invalid() {
        let mut config = AppConfig::default();
        config.presets = vec![SizePreset::fixed("flat", "Flat", 100, 0)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_preset_ids_are_invalid() {
        let mut config = AppConfig::default();
        config.presets.push(SizePreset::fixed("icon", "Again", 1, 1));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate preset id: icon"), "{err}");
    }

    #[test]
    fn empty_presets_are_invalid() {
        let mut config = AppConfig::default();
        config.presets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_tables_and_arrays() {
        let base: toml::Value = toml::from_str("a = [1, 2]\n[t]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = [3]\n[t]\ny = 5\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_array().unwrap().len(), 1);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(5));
    }

    #[test]
    fn effective_threads_clamps() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        let big = ProcessingConfig {
            max_processes: Some(cores + 100),
        };
        assert_eq!(effective_threads(&big), cores);
        let zero = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&zero), 1);
    }

    #[test]
    fn export_options_follow_config() {
        let mut config = AppConfig::default();
        config.export.filter = ResampleFilter::Nearest;
        config.export.max_pixels = 42;
        let options = config.export_options();
        assert_eq!(options.filter, ResampleFilter::Nearest);
        assert_eq!(options.max_pixels, 42);
    }
}
