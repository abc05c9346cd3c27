//! Word list loading.
//!
//! The word list is a spreadsheet (or CSV) with a header row. Column
//! detection lives in [`columns`], file formats in [`reader`], and the
//! alphabetical grouping used by the quiz in [`groups`]. Everything above
//! this module only sees sorted [`WordEntry`] values.

pub mod columns;
pub mod groups;
pub mod reader;

pub use columns::{detect_columns, ColumnMapping};
pub use groups::{filter_incorrect, partition, GroupPartitioner};

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use crate::domain::WordEntry;
use crate::error::DrillError;

/// Load and normalize a word list, sorted by lowercase word.
///
/// Rows with a blank word are dropped; duplicates are kept.
pub fn load(path: &Path) -> Result<Vec<WordEntry>, DrillError> {
    if !path.exists() {
        return Err(DrillError::DataSource(format!(
            "word list not found: {}",
            path.display()
        )));
    }

    let table = reader::read_table(path).map_err(DrillError::DataSource)?;
    let mapping = detect_columns(&table.headers, &table.rows);
    tracing::debug!("Column mapping for {}: {:?}", path.display(), mapping);

    let mut entries: Vec<WordEntry> = table
        .rows
        .iter()
        .filter_map(|row| {
            let (word, definition, sentence) = mapping.extract(row);
            WordEntry::new(word, definition, sentence)
        })
        .collect();

    // Stable, so duplicates keep their file order
    entries.sort_by_key(|e| e.sort_key());
    Ok(entries)
}

/// What the quiz sees of the word list at one point in time
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub groups: Arc<GroupPartitioner>,
    /// Set when the word list could not be read; the catalog is then empty
    pub warning: Option<String>,
}

struct CachedCatalog {
    modified: Option<SystemTime>,
    snapshot: CatalogSnapshot,
}

/// Word list cache, reloaded when the file's modification time changes
pub struct CatalogCache {
    path: PathBuf,
    group_count: usize,
    cached: Mutex<Option<CachedCatalog>>,
}

impl CatalogCache {
    pub fn new(path: PathBuf, group_count: usize) -> Self {
        Self {
            path,
            group_count,
            cached: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current catalog, loading or reloading the file as needed.
    ///
    /// Never fails: an unreadable file yields an empty catalog plus a
    /// warning for the page to show.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok();

        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cached.as_ref() {
            if entry.modified == modified {
                return entry.snapshot.clone();
            }
        }

        let snapshot = self.load_snapshot();
        *cached = Some(CachedCatalog {
            modified,
            snapshot: snapshot.clone(),
        });
        snapshot
    }

    fn load_snapshot(&self) -> CatalogSnapshot {
        match load(&self.path) {
            Ok(entries) => {
                tracing::info!(
                    "Loaded {} words from {}",
                    entries.len(),
                    self.path.display()
                );
                CatalogSnapshot {
                    groups: Arc::new(GroupPartitioner::new(entries, self.group_count)),
                    warning: None,
                }
            }
            Err(e) => {
                tracing::warn!("{}", e);
                CatalogSnapshot {
                    groups: Arc::new(GroupPartitioner::new(Vec::new(), self.group_count)),
                    warning: Some(e.to_string()),
                }
            }
        }
    }
}
