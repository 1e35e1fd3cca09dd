//! Aggregation of a multi-file catalog upload.

use crate::error::CatalogError;
use crate::parser::CatalogParser;
use crate::registry::ItemRegistry;
use crate::stackable::partition_stackable;
use dtab_kernel::item::ItemId;
use tracing::{info, warn};

/// Collects per-file results until [`UploadBatch::finish`].
#[derive(Debug, Default)]
pub struct UploadBatch {
    items: Vec<ItemId>,
    processed: Vec<String>,
    failed: Vec<String>,
}

impl UploadBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one uploaded file. Failures are recorded, never propagated.
    pub fn add_file(&mut self, parser: &CatalogParser, file_name: &str, bytes: &[u8]) {
        match parser.parse_upload(file_name, bytes) {
            Ok(catalog) if catalog.items.is_empty() => {
                self.failed.push(format!("{file_name} (no valid items found)"));
            },
            Ok(catalog) => {
                info!(file = file_name, items = catalog.items.len(), skipped = catalog.skipped, "Catalog parsed");
                self.processed.push(format!("{file_name} ({} items)", catalog.items.len()));
                self.items.extend(catalog.items);
            },
            Err(e) => {
                warn!(file = file_name, error = %e, "Catalog rejected");
                self.failed.push(format!("{file_name} ({})", e.reason()));
            },
        }
    }

    /// Records a part that could not even be read.
    pub fn add_failure(&mut self, file_name: &str, reason: &str) {
        self.failed.push(format!("{file_name} ({reason})"));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty() && self.failed.is_empty()
    }

    /// Deduplicates and filters the collected items.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] when no file produced an item.
    pub fn finish(self) -> Result<UploadReport, CatalogError> {
        if self.items.is_empty() {
            let mut message = String::from("No valid items found in any of the uploaded files");
            if !self.failed.is_empty() {
                message = format!("{message}: {}", self.failed.join(", "));
            }
            return Err(CatalogError::Empty { message: message.into(), context: None });
        }

        let total_items = self.items.len();
        let unique: ItemRegistry = self.items.into_iter().collect();
        let unique_items = unique.len();
        let (stackable, filtered) = partition_stackable(unique.into_vec());

        Ok(UploadReport {
            stackable,
            filtered,
            total_items,
            unique_items,
            processed_files: self.processed,
            failed_files: self.failed,
        })
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReport {
    /// Unique stackable items in first-seen order.
    pub stackable: Vec<ItemId>,
    pub filtered: Vec<ItemId>,
    /// Items across all files before deduplication.
    pub total_items: usize,
    pub unique_items: usize,
    pub processed_files: Vec<String>,
    pub failed_files: Vec<String>,
}

impl UploadReport {
    #[must_use]
    pub fn message(&self) -> String {
        let mut parts = vec![
            format!("Successfully processed {} file(s)", self.processed_files.len()),
            format!("Found {} unique items", self.unique_items),
        ];
        if !self.filtered.is_empty() {
            parts.push(format!("Filtered out {} non-stackable items", self.filtered.len()));
        }
        parts.push(format!("Ready to use: {} stackable items", self.stackable.len()));
        parts.join(". ")
    }

    #[must_use]
    pub fn warning(&self) -> Option<String> {
        (!self.failed_files.is_empty()).then(|| {
            format!("Some files could not be processed: {}", self.failed_files.join(", "))
        })
    }
}
