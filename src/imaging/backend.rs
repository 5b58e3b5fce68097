//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait defines the three operations the export
//! pipeline needs from a drawing surface: identify, rasterize, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests substitute a recording mock.

use super::params::RasterParams;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("No drawing surface available for {width}x{height}")]
    SurfaceUnavailable { width: u32, height: u32 },
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Trait for raster backends.
///
/// Backends must be `Sync`: the CLI exports several items at once from a
/// rayon pool, sharing a single backend.
pub trait RasterBackend: Sync {
    /// Natural dimensions of an encoded image.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode `bytes` and draw them stretch-fit onto a fresh
    /// `params.width × params.height` surface.
    fn rasterize(&self, bytes: &[u8], params: &RasterParams) -> Result<RgbaImage, BackendError>;

    /// Encode a surface as PNG.
    fn encode_png(&self, raster: &RgbaImage) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations and hands back blank surfaces.
    /// Uses Mutex (not RefCell) so it is Sync.
    pub struct MockBackend {
        pub natural: Dimensions,
        pub fail_rasterize: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify,
        Rasterize { width: u32, height: u32 },
        EncodePng { width: u32, height: u32 },
    }

    impl MockBackend {
        pub fn with_natural(width: u32, height: u32) -> Self {
            Self {
                natural: Dimensions::new(width, height),
                fail_rasterize: false,
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_rasterize: true,
                ..Self::with_natural(10, 10)
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl RasterBackend for MockBackend {
        fn identify(&self, _bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Identify);
            Ok(self.natural)
        }

        fn rasterize(
            &self,
            _bytes: &[u8],
            params: &RasterParams,
        ) -> Result<RgbaImage, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Rasterize {
                width: params.width,
                height: params.height,
            });
            if self.fail_rasterize {
                return Err(BackendError::SurfaceUnavailable {
                    width: params.width,
                    height: params.height,
                });
            }
            Ok(RgbaImage::new(params.width, params.height))
        }

        fn encode_png(&self, raster: &RgbaImage) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::EncodePng {
                width: raster.width(),
                height: raster.height(),
            });
            Ok(format!("png:{}x{}", raster.width(), raster.height()).into_bytes())
        }
    }

    #[test]
    fn mock_records_rasterize() {
        let backend = MockBackend::with_natural(800, 600);
        let raster = backend
            .rasterize(&[], &RasterParams::new(64, 32))
            .unwrap();
        assert_eq!(raster.dimensions(), (64, 32));
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Rasterize {
                width: 64,
                height: 32
            }]
        );
    }

    #[test]
    fn failing_mock_reports_missing_surface() {
        let backend = MockBackend::failing();
        let result = backend.rasterize(&[], &RasterParams::new(5, 5));
        assert!(matches!(
            result,
            Err(BackendError::SurfaceUnavailable {
                width: 5,
                height: 5
            })
        ));
    }
}
