//! View models for the collection grid and each item tile.
//!
//! These hold only what the UI owns: which tile is showing the download
//! menu, what the editor handed back, whether the "download all" action
//! applies. They borrow items from the [`Collection`]; nothing here mutates
//! an item's processed file.
//!
//! ```text
//! ItemPresentation
//!   status:  Processing ──► Ready
//!   actions: Processing → [Delete]
//!            Ready      → [Delete, Edit, Download]
//!   menu:    DownloadMenu (see selection.rs), only while Ready
//!   display: editor override ▸ processed file ▸ source file
//! ```

use crate::catalog::SizePreset;
use crate::config::MenuConfig;
use crate::export::{ExportError, ExportOptions, ExportedFile, export_from_menu};
use crate::imaging::RasterBackend;
use crate::media::{Collection, MediaItem, MediaKind};
use crate::saver::FileSaver;
use crate::selection::{AnchorRect, DownloadMenu};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Label shown over a tile whose processing has not finished.
pub const PROCESSING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Processing,
    Ready,
}

impl ItemStatus {
    pub fn of(item: &MediaItem) -> Self {
        if item.is_processed() {
            Self::Ready
        } else {
            Self::Processing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Delete,
    Edit,
    Download,
}

/// UI state of one tile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPresentation {
    menu: DownloadMenu,
    editor_open: bool,
    display_override: Option<Vec<u8>>,
}

impl ItemPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions offered for `item`. Edit and Download need a processed file.
    pub fn actions(item: &MediaItem) -> Vec<ItemAction> {
        match ItemStatus::of(item) {
            ItemStatus::Processing => vec![ItemAction::Delete],
            ItemStatus::Ready => vec![ItemAction::Delete, ItemAction::Edit, ItemAction::Download],
        }
    }

    pub fn menu(&self) -> &DownloadMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut DownloadMenu {
        &mut self.menu
    }

    /// Open the download menu beside `anchor`. Ignored while processing,
    /// since the Download button is not rendered then.
    pub fn open_menu(&mut self, item: &MediaItem, anchor: AnchorRect, offset_x: f64) -> bool {
        if ItemStatus::of(item) != ItemStatus::Ready {
            return false;
        }
        self.menu.open(anchor, offset_x);
        true
    }

    /// Backdrop click: close and reset the menu.
    pub fn dismiss_menu(&mut self) {
        self.menu.close();
    }

    /// Export `preset` in the menu's selected formats.
    pub fn download(
        &mut self,
        backend: &impl RasterBackend,
        saver: &impl FileSaver,
        options: &ExportOptions,
        item: &MediaItem,
        preset: &SizePreset,
    ) -> Result<Vec<ExportedFile>, ExportError> {
        export_from_menu(backend, saver, options, item, &mut self.menu, preset)
    }

    pub fn open_editor(&mut self, item: &MediaItem) -> bool {
        if ItemStatus::of(item) != ItemStatus::Ready {
            return false;
        }
        self.editor_open = true;
        true
    }

    pub fn close_editor(&mut self) {
        self.editor_open = false;
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    /// Editor save callback: show `edited` instead of the processed file.
    pub fn apply_edit(&mut self, edited: Vec<u8>) {
        debug!(bytes = edited.len(), "edit applied to display");
        self.display_override = Some(edited);
        self.editor_open = false;
    }

    /// Bytes the tile should show right now.
    pub fn display_bytes<'a>(&'a self, item: &'a MediaItem) -> &'a [u8] {
        self.display_override
            .as_deref()
            .or(item.processed.as_deref())
            .unwrap_or(item.source.bytes.as_slice())
    }
}

/// Flat description of one tile, for rendering and `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: u64,
    pub name: String,
    pub kind: MediaKind,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<&'static str>,
    pub actions: Vec<ItemAction>,
}

/// UI state of the whole grid, keyed by item id.
#[derive(Debug, Clone)]
pub struct CollectionPresentation {
    tiles: BTreeMap<u64, ItemPresentation>,
    menu_offset: f64,
}

impl Default for CollectionPresentation {
    fn default() -> Self {
        Self::with_menu(&MenuConfig::default())
    }
}

impl CollectionPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid whose download menus open per the `[menu]` config section.
    pub fn with_menu(menu: &MenuConfig) -> Self {
        Self {
            tiles: BTreeMap::new(),
            menu_offset: menu.offset_x,
        }
    }

    /// Open `item`'s download menu beside `anchor` at the configured
    /// offset. False if the item has no tile or is still processing.
    pub fn open_menu(&mut self, item: &MediaItem, anchor: AnchorRect) -> bool {
        let offset = self.menu_offset;
        self.tiles
            .get_mut(&item.id)
            .is_some_and(|tile| tile.open_menu(item, anchor, offset))
    }

    /// Add tiles for new items and drop tiles for deleted ones.
    pub fn sync(&mut self, collection: &Collection) {
        self.tiles.retain(|id, _| collection.get(*id).is_some());
        for item in collection.items() {
            self.tiles.entry(item.id).or_default();
        }
    }

    pub fn tile(&self, id: u64) -> Option<&ItemPresentation> {
        self.tiles.get(&id)
    }

    pub fn tile_mut(&mut self, id: u64) -> Option<&mut ItemPresentation> {
        self.tiles.get_mut(&id)
    }

    /// Delete callback: remove the item upstream and its tile here.
    pub fn delete(&mut self, collection: &mut Collection, id: u64) -> Option<MediaItem> {
        self.tiles.remove(&id);
        collection.remove(id)
    }

    /// Grid contents in collection order.
    pub fn views(collection: &Collection) -> Vec<ItemView> {
        collection
            .items()
            .iter()
            .map(|item| {
                let status = ItemStatus::of(item);
                ItemView {
                    id: item.id,
                    name: item.source.name.clone(),
                    kind: item.kind(),
                    status,
                    overlay: (status == ItemStatus::Processing).then_some(PROCESSING_LABEL),
                    actions: ItemPresentation::actions(item),
                }
            })
            .collect()
    }

    /// "Download All" is only offered once there is more than one item.
    pub fn shows_download_all(collection: &Collection) -> bool {
        collection.len() > 1
    }
}
