//! Rasterization: the in-memory "canvas" every export is drawn onto.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Decode** | `image::load_from_memory` |
//! | **Draw (stretch-fit)** | `DynamicImage::resize_exact` |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for surface sizing (unit testable)
//! - **Parameters**: Data structures describing a draw
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: [`render_preset`], combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, RasterBackend};
pub use calculations::{DEFAULT_MAX_PIXELS, canvas_dimensions, check_surface};
pub use operations::render_preset;
pub use params::{RasterParams, ResampleFilter};
pub use rust_backend::RustBackend;
