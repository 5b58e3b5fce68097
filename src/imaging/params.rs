//! Parameter types for raster operations.
//!
//! These structs describe *what* to draw, not *how*. They are the interface
//! between [`operations`](super::operations), which decides the surface size,
//! and the [`backend`](super::backend), which does the pixel work.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Resampling filter used when stretching a bitmap onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    /// Bilinear; closest to what a browser canvas does by default.
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for a single draw onto a fresh surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterParams {
    pub width: u32,
    pub height: u32,
    pub filter: ResampleFilter,
}

impl RasterParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: ResampleFilter::default(),
        }
    }

    pub fn with_filter(self, filter: ResampleFilter) -> Self {
        Self { filter, ..self }
    }
}
