use std::collections::{BTreeMap, HashSet};

use crate::types::CatalogEntry;

/// The merged, de-duplicated word list of one session.
///
/// Entries keep their insertion order. No two entries share a
/// [`CatalogEntry::dedup_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    keys: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the entry unless an entry with the same key is already present.
    /// Returns true when the entry was added.
    pub fn insert(&mut self, entry: CatalogEntry) -> bool {
        if self.keys.insert(entry.dedup_key()) {
            self.entries.push(entry);
            true
        } else {
            false
        }
    }

    pub fn extend<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut added = 0;
        for entry in entries {
            if self.insert(entry) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Distinct topic labels in first-seen order.
    pub fn topics(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.topic.as_str()))
            .map(|e| e.topic.clone())
            .collect()
    }

    pub fn count_by_topic(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for e in self.entries.iter() {
            *counts.entry(e.topic.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Entry counts per level. Entries without a level are counted under the empty string.
    pub fn count_by_level(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for e in self.entries.iter() {
            *counts.entry(e.level.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
