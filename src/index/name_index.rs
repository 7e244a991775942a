//! Secondary index from folded record name to record ids
//!
//! Uses BTreeMap<String, BTreeSet<i64>> so buckets iterate in ascending id
//! order. A bucket never stays behind empty.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::{fold_name, Record};

/// Folded name -> ids of every record carrying that name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameIndex {
    buckets: BTreeMap<String, BTreeSet<i64>>,
}

impl NameIndex {
    /// Creates a new empty index
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Builds an index from scratch over the given records
    pub fn rebuild<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.add(record);
        }
        index
    }

    /// Adds the record's id under its folded name, creating the bucket if absent
    pub fn add(&mut self, record: &Record) {
        self.buckets
            .entry(record.folded_name())
            .or_default()
            .insert(record.id());
    }

    /// Removes the record's id from its bucket.
    ///
    /// If the bucket has no more ids, removes the bucket entirely.
    pub fn remove(&mut self, record: &Record) {
        let key = record.folded_name();
        if let Some(ids) = self.buckets.get_mut(&key) {
            ids.remove(&record.id());
            if ids.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    /// Ids whose folded name equals the folded form of `name`, ascending.
    pub fn lookup(&self, name: &str) -> Vec<i64> {
        self.buckets
            .get(&fold_name(name))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the number of distinct names
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the total number of indexed ids
    pub fn id_count(&self) -> usize {
        self.buckets.values().map(|ids| ids.len()).sum()
    }
}
