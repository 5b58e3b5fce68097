//! # batch-export
//!
//! Export side of a batch media uploader. Uploads become a [`media::Collection`];
//! once an item's processed PNG arrives it can be exported at any catalog
//! size as PNG or SVG, or bundled with every other processed item into a
//! single zip.
//!
//! # Pipeline
//!
//! ```text
//! processed PNG ─► rasterize at preset size ─► PNG ─┬─► FileSaver  processed-<id>-<w>x<h>.png
//!                                                   └─► SVG wrapper processed-<id>-<w>x<h>.svg
//!
//! all processed PNGs ─► zip ─► FileSaver  processed-images.zip
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Output formats and the size preset catalog |
//! | [`naming`] | Deterministic export and archive filenames |
//! | [`media`] | Uploaded items and the owning collection |
//! | [`imaging`] | Drawing surfaces: identify, stretch-fit, PNG encode |
//! | [`serialize`] | Surface → PNG bytes or SVG document |
//! | [`saver`] | The `FileSaver` capability: directory or in-memory |
//! | [`export`] | Per-item multi-format export, batch export |
//! | [`archive`] | "Download all" zip |
//! | [`selection`] | Download menu state machine |
//! | [`presentation`] | Grid and tile view models |
//! | [`scan`] | Building a collection from upload/processed directories |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Saving Is a Capability
//!
//! Nothing in the pipeline writes files directly. Every export and archive
//! goes through a [`saver::FileSaver`], so the same code writes into a
//! download directory from the CLI and into a [`saver::MemorySaver`] in tests.
//!
//! ## UI State Is a Value
//!
//! The per-tile download menu is an explicit [`selection::DownloadMenu`]
//! enum rather than loose flags. Closing the menu replaces the value, which
//! is what resets selected formats and the "already downloaded" marks.
//!
//! ## Failures Are Reported
//!
//! An export that cannot get a drawing surface (zero-sized or over
//! `export.max_pixels`) returns [`imaging::BackendError::SurfaceUnavailable`]
//! instead of quietly doing nothing.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod export;
pub mod imaging;
pub mod media;
pub mod naming;
pub mod output;
pub mod presentation;
pub mod saver;
pub mod scan;
pub mod selection;
pub mod serialize;

#[cfg(test)]
pub(crate) mod test_helpers;
