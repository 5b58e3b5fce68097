//! High-level raster operations.
//!
//! These functions combine calculations with backend execution: decide the
//! surface size for a preset, make sure it can exist, then draw.

use super::backend::{BackendError, RasterBackend};
use super::calculations::{canvas_dimensions, check_surface};
use super::params::{RasterParams, ResampleFilter};
use crate::catalog::SizePreset;
use image::RgbaImage;
use tracing::debug;

/// Draw `bytes` onto a surface sized for `preset`.
///
/// Identify only reads the image header, so it runs for every preset; a
/// corrupt upload fails here before any surface is allocated.
pub fn render_preset(
    backend: &impl RasterBackend,
    bytes: &[u8],
    preset: &SizePreset,
    filter: ResampleFilter,
    max_pixels: u64,
) -> Result<RgbaImage, BackendError> {
    let natural = backend.identify(bytes)?;
    let dims = canvas_dimensions(preset.target_size(), natural);
    check_surface(dims, max_pixels)?;
    debug!(
        preset = %preset.id,
        width = dims.width,
        height = dims.height,
        "drawing surface"
    );
    backend.rasterize(
        bytes,
        &RasterParams::new(dims.width, dims.height).with_filter(filter),
    )
}
