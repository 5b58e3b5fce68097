//! The export pipeline: draw, serialize, save.
//!
//! ```text
//! processed PNG ──► render_preset ──► serialize(PNG | SVG) ──► FileSaver
//!                   (surface sized     (SVG = PNG wrapped       processed-<id>-<w>x<h>.<ext>
//!                    by the preset)     as a data URI)
//! ```
//!
//! [`export_selection`] runs the pipeline once per selected format, strictly
//! in selection order: each format is drawn, encoded and saved before the
//! next one starts. [`export_many`] fans several items out over the rayon
//! pool; the per-item ordering still holds inside each worker.
//!
//! ## Failures
//!
//! Nothing fails silently. An unobtainable surface comes back as
//! [`BackendError::SurfaceUnavailable`], a refused save as [`SaveError`].
//! A failure stops the item's remaining formats; files already saved stay.

use crate::catalog::{OutputFormat, SizePreset};
use crate::imaging::{
    BackendError, DEFAULT_MAX_PIXELS, RasterBackend, ResampleFilter, render_preset,
};
use crate::media::MediaItem;
use crate::naming::export_filename;
use crate::saver::{FileSaver, SaveError};
use crate::selection::{DownloadMenu, SelectionError};
use crate::serialize::serialize;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Rendering failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Save failed: {0}")]
    Save(#[from] SaveError),
    #[error("Menu state: {0}")]
    Selection(#[from] SelectionError),
    #[error("Item {0} has not finished processing")]
    NotProcessed(u64),
    #[error("No output format selected")]
    NoFormatSelected,
}

/// Knobs for the drawing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub filter: ResampleFilter,
    pub max_pixels: u64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::default(),
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Record of one saved export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub item_id: u64,
    pub preset_id: String,
    pub format: OutputFormat,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

/// Outcome of exporting one item as part of a batch.
#[derive(Debug)]
pub struct ItemExport {
    pub item_id: u64,
    pub result: Result<Vec<ExportedFile>, ExportError>,
}

/// Export one format of one image and save it.
pub fn export_file(
    backend: &impl RasterBackend,
    saver: &impl FileSaver,
    options: &ExportOptions,
    item_id: u64,
    bytes: &[u8],
    preset: &SizePreset,
    format: OutputFormat,
) -> Result<ExportedFile, ExportError> {
    let raster = render_preset(backend, bytes, preset, options.filter, options.max_pixels)?;
    let encoded = serialize(backend, &raster, format)?;
    let filename = export_filename(item_id, preset, format);
    saver.save(&filename, &encoded)?;

    debug!(item_id, %filename, "exported");
    Ok(ExportedFile {
        item_id,
        preset_id: preset.id.clone(),
        format,
        filename,
        width: raster.width(),
        height: raster.height(),
        size_bytes: encoded.len(),
    })
}

/// Export `item` at `preset` once per format, in the given order.
pub fn export_selection(
    backend: &impl RasterBackend,
    saver: &impl FileSaver,
    options: &ExportOptions,
    item: &MediaItem,
    preset: &SizePreset,
    formats: &[OutputFormat],
) -> Result<Vec<ExportedFile>, ExportError> {
    if formats.is_empty() {
        return Err(ExportError::NoFormatSelected);
    }
    let bytes = item
        .processed
        .as_deref()
        .ok_or(ExportError::NotProcessed(item.id))?;

    let mut exported = Vec::with_capacity(formats.len());
    for &format in formats {
        exported.push(export_file(
            backend, saver, options, item.id, bytes, preset, format,
        )?);
    }
    info!(
        item_id = item.id,
        preset = %preset.id,
        files = exported.len(),
        "selection exported"
    );
    Ok(exported)
}

/// Export using the formats currently selected in `menu`, then mark the
/// preset as downloaded for this menu session.
///
/// The preset is only marked when every format succeeded.
pub fn export_from_menu(
    backend: &impl RasterBackend,
    saver: &impl FileSaver,
    options: &ExportOptions,
    item: &MediaItem,
    menu: &mut DownloadMenu,
    preset: &SizePreset,
) -> Result<Vec<ExportedFile>, ExportError> {
    if !menu.is_open() {
        return Err(SelectionError::MenuClosed.into());
    }
    let formats = menu.selected_formats().to_vec();
    let exported = export_selection(backend, saver, options, item, preset, &formats)?;
    menu.mark_downloaded(&preset.id)?;
    Ok(exported)
}

/// Export several items in parallel. Results come back in input order.
pub fn export_many(
    backend: &impl RasterBackend,
    saver: &impl FileSaver,
    options: &ExportOptions,
    items: &[&MediaItem],
    preset: &SizePreset,
    formats: &[OutputFormat],
) -> Vec<ItemExport> {
    items
        .par_iter()
        .map(|item| {
            let result = export_selection(backend, saver, options, item, preset, formats);
            if let Err(e) = &result {
                warn!(item_id = item.id, error = %e, "export failed");
            }
            ItemExport {
                item_id: item.id,
                result,
            }
        })
        .collect()
}
