//! Pure calculation functions for surface sizing.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::{BackendError, Dimensions};

/// Largest surface (in pixels) the rasterizer allocates unless configured
/// otherwise. 100 megapixels of RGBA is 400 MB.
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

/// Surface size for a draw.
///
/// A preset's target size wins when present; otherwise the bitmap's natural
/// size is used. There is no aspect-ratio correction: the bitmap is stretched.
///
/// ```
/// # use batch_export::imaging::{Dimensions, canvas_dimensions};
/// let natural = Dimensions::new(800, 600);
/// assert_eq!(canvas_dimensions(Some((64, 64)), natural), Dimensions::new(64, 64));
/// assert_eq!(canvas_dimensions(None, natural), natural);
/// ```
pub fn canvas_dimensions(target: Option<(u32, u32)>, natural: Dimensions) -> Dimensions {
    match target {
        Some((width, height)) => Dimensions { width, height },
        None => natural,
    }
}

/// Refuse surfaces that cannot be allocated: zero-sized, or larger than
/// `max_pixels`.
pub fn check_surface(dims: Dimensions, max_pixels: u64) -> Result<(), BackendError> {
    let pixels = dims.width as u64 * dims.height as u64;
    if pixels == 0 || pixels > max_pixels {
        return Err(BackendError::SurfaceUnavailable {
            width: dims.width,
            height: dims.height,
        });
    }
    Ok(())
}
