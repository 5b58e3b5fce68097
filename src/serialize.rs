//! Turning a drawn surface into file bytes.
//!
//! PNG is the backend's encoding of the surface. SVG is that same PNG
//! wrapped in a minimal XML document:
//!
//! ```text
//! <svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="64" height="64">
//!   <image width="64" height="64" href="data:image/png;base64,..." xlink:href="..."/>
//! </svg>
//! ```
//!
//! The SVG's `width`/`height` are always the surface's, never the source's.

use crate::catalog::OutputFormat;
use crate::imaging::{BackendError, RasterBackend};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;

/// Serialize `raster` in `format`.
pub fn serialize(
    backend: &impl RasterBackend,
    raster: &RgbaImage,
    format: OutputFormat,
) -> Result<Vec<u8>, BackendError> {
    let png = backend.encode_png(raster)?;
    match format {
        OutputFormat::Png => Ok(png),
        OutputFormat::Svg => Ok(svg_document(&png, raster.width(), raster.height()).into_bytes()),
    }
}

/// Wrap PNG bytes in an SVG document of the given pixel size.
///
/// Both `href` and `xlink:href` are written so older renderers that only
/// understand SVG 1.1 still resolve the image.
pub fn svg_document(png: &[u8], width: u32, height: u32) -> String {
    let data_uri = format!(
        "data:{};base64,{}",
        OutputFormat::Png.mime(),
        STANDARD.encode(png)
    );
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n",
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            "\n",
            r#"  <image x="0" y="0" width="{w}" height="{h}" href="{uri}" xlink:href="{uri}"/>"#,
            "\n",
            "</svg>\n"
        ),
        w = width,
        h = height,
        uri = data_uri
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::MockBackend;

    /// Pull the value of the first `name="..."` attribute out of `doc`.
    fn attr<'a>(doc: &'a str, name: &str) -> &'a str {
        let key = format!(" {}=\"", name);
        let start = doc.find(&key).unwrap() + key.len();
        let end = start + doc[start..].find('"').unwrap();
        &doc[start..end]
    }

    #[test]
    fn png_output_is_backend_encoding() {
        let backend = MockBackend::with_natural(1, 1);
        let bytes = serialize(&backend, &RgbaImage::new(3, 2), OutputFormat::Png).unwrap();
        assert_eq!(bytes, b"png:3x2");
    }

    #[test]
    fn svg_carries_surface_dimensions() {
        let backend = MockBackend::with_natural(800, 600);
        let bytes = serialize(&backend, &RgbaImage::new(64, 32), OutputFormat::Svg).unwrap();
        let doc = String::from_utf8(bytes).unwrap();
        let svg = &doc[doc.find("<svg").unwrap()..];
        assert_eq!(attr(svg, "width"), "64");
        assert_eq!(attr(svg, "height"), "32");

        let image = &doc[doc.find("<image").unwrap()..];
        assert_eq!(attr(image, "width"), "64");
        assert_eq!(attr(image, "height"), "32");
    }

    #[test]
    fn svg_embeds_decodable_png() {
        let backend = RustBackend::new();
        let bytes = serialize(&backend, &RgbaImage::new(5, 7), OutputFormat::Svg).unwrap();
        let doc = String::from_utf8(bytes).unwrap();
        let image = &doc[doc.find("<image").unwrap()..];
        let href = attr(image, "href");
        let encoded = href.strip_prefix("data:image/png;base64,").unwrap();
        let png = STANDARD.decode(encoded).unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 7));
    }

    #[test]
    fn svg_document_is_well_formed_shell() {
        let doc = svg_document(b"abc", 10, 20);
        assert!(doc.starts_with("<?xml"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert!(doc.contains("viewBox=\"0 0 10 20\""));
        assert!(doc.contains("data:image/png;base64,YWJj"));
    }
}
