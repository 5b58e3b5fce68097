//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 001 beach.jpg [image] ready
//!     Actions: delete, edit, download
//! 002 clip.mp4 [video] Processing...
//!     Actions: delete
//!
//! 2 items, 1 processed · download-all available
//! ```
//!
//! ## Export
//!
//! ```text
//! 001 processed-1-64x64.png (64x64, 1.2 KB)
//! 001 processed-1-64x64.svg (64x64, 1.8 KB)
//! 002 failed: Item 2 has not finished processing
//! ```

use crate::archive::Archive;
use crate::catalog::SizePreset;
use crate::export::ItemExport;
use crate::presentation::{ItemAction, ItemStatus, ItemView};

/// Format an item id as 3-digit zero-padded.
fn format_index(id: u64) -> String {
    format!("{:0>3}", id)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte size.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

fn action_name(action: ItemAction) -> &'static str {
    match action {
        ItemAction::Delete => "delete",
        ItemAction::Edit => "edit",
        ItemAction::Download => "download",
    }
}

/// Format the collection grid.
pub fn format_list(views: &[ItemView], shows_download_all: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for view in views {
        let kind = match view.kind {
            crate::media::MediaKind::Image => "image",
            crate::media::MediaKind::Video => "video",
        };
        let status = match (view.status, view.overlay) {
            (_, Some(overlay)) => overlay,
            (ItemStatus::Ready, None) => "ready",
            (ItemStatus::Processing, None) => "processing",
        };
        lines.push(format!(
            "{} {} [{}] {}",
            format_index(view.id),
            view.name,
            kind,
            status
        ));
        let actions: Vec<&str> = view.actions.iter().map(|a| action_name(*a)).collect();
        lines.push(format!("{}Actions: {}", indent(1), actions.join(", ")));
    }

    let processed = views
        .iter()
        .filter(|v| v.status == ItemStatus::Ready)
        .count();
    lines.push(String::new());
    let mut summary = format!("{} items, {} processed", views.len(), processed);
    if shows_download_all {
        summary.push_str(" · download-all available");
    }
    lines.push(summary);
    lines
}

pub fn print_list(views: &[ItemView], shows_download_all: bool) {
    for line in format_list(views, shows_download_all) {
        println!("{}", line);
    }
}

/// Format the size catalog.
pub fn format_presets(presets: &[SizePreset]) -> Vec<String> {
    let width = presets.iter().map(|p| p.id.len()).max().unwrap_or(0);
    presets
        .iter()
        .map(|p| {
            let size = match p.target_size() {
                Some((w, h)) => format!("{}x{}", w, h),
                None => "source size".to_string(),
            };
            format!("{:<width$}  {} ({})", p.id, p.label, size, width = width)
        })
        .collect()
}

pub fn print_presets(presets: &[SizePreset]) {
    for line in format_presets(presets) {
        println!("{}", line);
    }
}

/// Format batch export results, one line per saved file or failure.
pub fn format_exports(results: &[ItemExport]) -> Vec<String> {
    let mut lines = Vec::new();
    for export in results {
        match &export.result {
            Ok(files) => {
                for file in files {
                    lines.push(format!(
                        "{} {} ({}x{}, {})",
                        format_index(export.item_id),
                        file.filename,
                        file.width,
                        file.height,
                        format_size(file.size_bytes)
                    ));
                }
            }
            Err(e) => lines.push(format!("{} failed: {}", format_index(export.item_id), e)),
        }
    }
    lines
}

pub fn print_exports(results: &[ItemExport]) {
    for line in format_exports(results) {
        println!("{}", line);
    }
}

/// Format the download-all summary.
pub fn format_archive(archive: &Archive, filename: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({} entries, {})",
        filename,
        archive.entries.len(),
        format_size(archive.bytes.len())
    )];
    for entry in &archive.entries {
        lines.push(format!("{}{}", indent(1), entry));
    }
    if !archive.skipped.is_empty() {
        let ids: Vec<String> = archive.skipped.iter().map(|id| format_index(*id)).collect();
        lines.push(format!("{}Still processing: {}", indent(1), ids.join(", ")));
    }
    lines
}

pub fn print_archive(archive: &Archive, filename: &str) {
    for line in format_archive(archive, filename) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OutputFormat, default_presets};
    use crate::export::{ExportError, ExportedFile};
    use crate::media::MediaKind;

    fn views() -> Vec<ItemView> {
        vec![
            ItemView {
                id: 1,
                name: "beach.jpg".into(),
                kind: MediaKind::Image,
                status: ItemStatus::Ready,
                overlay: None,
                actions: vec![ItemAction::Delete, ItemAction::Edit, ItemAction::Download],
            },
            ItemView {
                id: 2,
                name: "clip.mp4".into(),
                kind: MediaKind::Video,
                status: ItemStatus::Processing,
                overlay: Some("Processing..."),
                actions: vec![ItemAction::Delete],
            },
        ]
    }

    #[test]
    fn list_output() {
        let lines = format_list(&views(), true);
        assert_eq!(
            lines,
            vec![
                "001 beach.jpg [image] ready",
                "    Actions: delete, edit, download",
                "002 clip.mp4 [video] Processing...",
                "    Actions: delete",
                "",
                "2 items, 1 processed · download-all available",
            ]
        );
    }

    #[test]
    fn list_without_download_all() {
        let lines = format_list(&views()[..1], false);
        assert_eq!(lines.last().unwrap(), "1 items, 1 processed");
    }

    #[test]
    fn presets_output() {
        let lines = format_presets(&default_presets()[..3]);
        assert_eq!(
            lines,
            vec![
                "original    Original Size (source size)",
                "icon-small  Icon (32×32) (32x32)",
                "icon        Icon (64×64) (64x64)",
            ]
        );
    }

    #[test]
    fn exports_output() {
        let results = vec![
            ItemExport {
                item_id: 1,
                result: Ok(vec![ExportedFile {
                    item_id: 1,
                    preset_id: "icon".into(),
                    format: OutputFormat::Png,
                    filename: "processed-1-64x64.png".into(),
                    width: 64,
                    height: 64,
                    size_bytes: 2048,
                }]),
            },
            ItemExport {
                item_id: 2,
                result: Err(ExportError::NotProcessed(2)),
            },
        ];
        assert_eq!(
            format_exports(&results),
            vec![
                "001 processed-1-64x64.png (64x64, 2.0 KB)",
                "002 failed: Item 2 has not finished processing",
            ]
        );
    }

    #[test]
    fn archive_output_lists_skipped() {
        let archive = Archive {
            bytes: vec![0; 10],
            entries: vec!["processed-1.png".into()],
            skipped: vec![2],
        };
        assert_eq!(
            format_archive(&archive, "processed-images.zip"),
            vec![
                "processed-images.zip (1 entries, 10 B)",
                "    processed-1.png",
                "    Still processing: 002",
            ]
        );
    }

    #[test]
    fn size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
