//! Alphabetical groups and derived word pools

use std::collections::HashSet;
use std::ops::Range;

use crate::domain::{PoolMode, WordEntry};
use crate::error::DrillError;

/// Split `len` sorted entries into `group_count` contiguous ranges.
///
/// Sizes differ by at most one; the leading groups take the remainder.
pub fn partition(len: usize, group_count: usize) -> Vec<Range<usize>> {
    let group_count = group_count.max(1);
    let base = len / group_count;
    let remainder = len % group_count;

    let mut start = 0;
    (0..group_count)
        .map(|i| {
            let size = base + usize::from(i < remainder);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Sorted catalog with its group boundaries
#[derive(Debug, Clone, Default)]
pub struct GroupPartitioner {
    catalog: Vec<WordEntry>,
    bounds: Vec<Range<usize>>,
}

impl GroupPartitioner {
    /// `catalog` must already be sorted by `WordEntry::sort_key`
    pub fn new(catalog: Vec<WordEntry>, group_count: usize) -> Self {
        let bounds = partition(catalog.len(), group_count);
        Self { catalog, bounds }
    }

    pub fn catalog(&self) -> &[WordEntry] {
        &self.catalog
    }

    pub fn group_count(&self) -> usize {
        self.bounds.len()
    }

    /// Entries of group `n` (1-based); None when out of range
    pub fn group(&self, n: usize) -> Option<&[WordEntry]> {
        let range = self.bounds.get(n.checked_sub(1)?)?;
        Some(&self.catalog[range.clone()])
    }

    /// Every group, numbered from 1
    pub fn groups(&self) -> impl Iterator<Item = (usize, &[WordEntry])> {
        self.bounds
            .iter()
            .enumerate()
            .map(|(i, range)| (i + 1, &self.catalog[range.clone()]))
    }

    /// Entries for a quiz mode, in catalog order.
    ///
    /// `incorrect_words` must hold lowercased words, as returned by
    /// `ProgressStore::distinct_incorrect_words`.
    pub fn resolve_pool(
        &self,
        mode: PoolMode,
        incorrect_words: &HashSet<String>,
    ) -> Result<Vec<WordEntry>, DrillError> {
        let pool = match mode {
            PoolMode::All => self.catalog.to_vec(),
            PoolMode::Group(n) => self
                .group(n)
                .ok_or(DrillError::InvalidGroup {
                    group: n,
                    group_count: self.group_count(),
                })?
                .to_vec(),
            PoolMode::Incorrect => filter_incorrect(&self.catalog, incorrect_words),
        };

        if pool.is_empty() {
            return Err(DrillError::EmptyPool(mode.display_name()));
        }
        Ok(pool)
    }
}

/// Catalog entries whose word (case-insensitively) is in `incorrect_words`
pub fn filter_incorrect(catalog: &[WordEntry], incorrect_words: &HashSet<String>) -> Vec<WordEntry> {
    catalog
        .iter()
        .filter(|entry| incorrect_words.contains(&entry.sort_key()))
        .cloned()
        .collect()
}
