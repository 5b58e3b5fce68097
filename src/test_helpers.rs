//! Shared test utilities: synthetic images and ready-made collections.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let c = sample_collection();   // item 1 ready, item 2 processing, item 3 ready
//! let png = png_bytes(64, 48);   // gradient PNG
//! ```

use crate::media::{Collection, SourceFile};
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

// =========================================================================
// Synthetic images
// =========================================================================

/// Encode a `width × height` gradient as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    out
}

/// Encode a `width × height` gradient as JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

// =========================================================================
// Collections
// =========================================================================

/// Three uploads: 1 (ready, 300×200), 2 (video, still processing),
/// 3 (ready, 40×40).
pub fn sample_collection() -> Collection {
    let mut c = Collection::new();
    let beach = c.upload(SourceFile::new("beach.jpg", "image/jpeg", jpeg_bytes(300, 200)));
    c.upload(SourceFile::new("clip.mp4", "video/mp4", b"not really a video".to_vec()));
    let logo = c.upload(SourceFile::new("logo.png", "image/png", png_bytes(40, 40)));
    c.attach_processed(beach, png_bytes(300, 200)).unwrap();
    c.attach_processed(logo, png_bytes(40, 40)).unwrap();
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_collection_shape() {
        let c = sample_collection();
        let processed: Vec<u64> = c.processed().map(|i| i.id).collect();
        assert_eq!(processed, vec![1, 3]);
    }
}
