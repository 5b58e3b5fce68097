//! Output formats and the size preset catalog.
//!
//! A [`SizePreset`] either names an exact pixel size (`icon` → 64×64) or,
//! when it carries no dimensions, means "keep the source's natural size".
//! The stock catalog is returned by [`default_presets`]; a `config.toml` can
//! replace it wholesale with its own `[[presets]]` list.
//!
//! ## Stock Catalog
//!
//! ```text
//! original      Original Size
//! icon-small    Icon (32×32)
//! icon          Icon (64×64)
//! thumbnail     Thumbnail (150×150)
//! small         Small (320×240)
//! medium        Medium (640×480)
//! large         Large (1024×768)
//! hd            HD (1280×720)
//! full-hd       Full HD (1920×1080)
//! square        Square (1080×1080)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File format an export can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Png, OutputFormat::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Svg => "SVG",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => {
                let known: Vec<&str> = Self::ALL.iter().map(|f| f.extension()).collect();
                Err(format!(
                    "unsupported output format: {other} (expected one of {})",
                    known.join(", ")
                ))
            }
        }
    }
}

/// A named output size.
///
/// `width`/`height` are either both present (fixed target size) or both
/// absent (original size). Config validation rejects half-specified presets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizePreset {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl SizePreset {
    pub fn original() -> Self {
        Self {
            id: "original".to_string(),
            label: "Original Size".to_string(),
            width: None,
            height: None,
        }
    }

    pub fn fixed(id: &str, label: &str, width: u32, height: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Target pixel size, when the preset names one.
    pub fn target_size(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }

    /// True when exports under this preset keep the source's natural size.
    pub fn is_original(&self) -> bool {
        self.target_size().is_none()
    }
}

/// The stock size catalog, in display order.
pub fn default_presets() -> Vec<SizePreset> {
    vec![
        SizePreset::original(),
        SizePreset::fixed("icon-small", "Icon (32×32)", 32, 32),
        SizePreset::fixed("icon", "Icon (64×64)", 64, 64),
        SizePreset::fixed("thumbnail", "Thumbnail (150×150)", 150, 150),
        SizePreset::fixed("small", "Small (320×240)", 320, 240),
        SizePreset::fixed("medium", "Medium (640×480)", 640, 480),
        SizePreset::fixed("large", "Large (1024×768)", 1024, 768),
        SizePreset::fixed("hd", "HD (1280×720)", 1280, 720),
        SizePreset::fixed("full-hd", "Full HD (1920×1080)", 1920, 1080),
        SizePreset::fixed("square", "Square (1080×1080)", 1080, 1080),
    ]
}

/// Look up a preset by id.
pub fn find_preset<'a>(presets: &'a [SizePreset], id: &str) -> Option<&'a SizePreset> {
    presets.iter().find(|p| p.id == id)
}
