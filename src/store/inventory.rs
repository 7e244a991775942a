//! The record store
//!
//! Every mutating call follows the same protocol:
//!
//! ```text
//! apply to records + name index  ->  persist full image  ->  Persisted
//!                                          |
//!                                          +-- failure -->  restore snapshot  ->  RolledBack
//! ```
//!
//! A call that returns `Err` leaves records, name index and the committed
//! file exactly as they were before the call. Reads never touch disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::index::NameIndex;
use crate::observability::{log_event_with_fields, Event};
use crate::record::{EntryFormat, Record, RecordResult};

use super::config::StoreConfig;
use super::errors::StoreResult;
use super::loader::{parse_image, render_image, LoadDiagnostic, Loaded};
use super::persist::{AtomicFile, Persister};

/// Read-only projection of a record: (id, name, quantity, price)
pub type RecordRow = (i64, String, i64, f64);

/// Keyed record collection with a name index and atomic persistence.
///
/// Mutators take `&mut self`: the in-memory change and its persist form a
/// single critical section. Share a store across threads by wrapping the
/// whole store in one `Mutex`.
pub struct Store<P: Persister = AtomicFile> {
    records: BTreeMap<i64, Record>,
    name_index: NameIndex,
    persister: P,
    format: EntryFormat,
    diagnostics: Vec<LoadDiagnostic>,
    replaced: usize,
}

impl Store<AtomicFile> {
    /// Opens the store file named by `config`, loading whatever it holds.
    ///
    /// A missing file yields an empty store. Malformed lines are skipped and
    /// reported through [`Store::diagnostics`].
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let persister = AtomicFile::new(config.path).sync_directory(config.sync_directory);
        Self::with_persister(persister, config.format)
    }
}

impl<P: Persister> Store<P> {
    /// Opens a store on an arbitrary persister.
    pub fn with_persister(persister: P, format: EntryFormat) -> StoreResult<Self> {
        let mut store = Self {
            records: BTreeMap::new(),
            name_index: NameIndex::new(),
            persister,
            format,
            diagnostics: Vec::new(),
            replaced: 0,
        };
        let loaded = store.read_image()?;
        store.install(loaded);
        store.log_loaded(Event::StoreOpened);

        Ok(store)
    }

    // ---- mutations ----

    /// Inserts a new record.
    ///
    /// Returns `Ok(false)` without touching anything if the id is taken;
    /// replacing a record means deleting it first.
    pub fn insert(&mut self, record: Record) -> StoreResult<bool> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Ok(false);
        }

        self.name_index.add(&record);
        self.records.insert(id, record);

        if let Err(e) = self.persist() {
            if let Some(record) = self.records.remove(&id) {
                self.name_index.remove(&record);
            }
            self.log_rollback("insert", id);
            return Err(e);
        }
        Ok(true)
    }

    /// Deletes a record. Returns `Ok(false)` if the id is absent.
    pub fn delete(&mut self, id: i64) -> StoreResult<bool> {
        let Some(record) = self.records.remove(&id) else {
            return Ok(false);
        };
        self.name_index.remove(&record);

        if let Err(e) = self.persist() {
            self.name_index.add(&record);
            self.records.insert(id, record);
            self.log_rollback("delete", id);
            return Err(e);
        }
        Ok(true)
    }

    /// Sets a record's quantity.
    ///
    /// `Ok(false)` if the id is absent, `Err(Validation)` if `quantity < 0`.
    pub fn update_quantity(&mut self, id: i64, quantity: i64) -> StoreResult<bool> {
        self.modify(id, "update_quantity", |r| r.set_quantity(quantity))
    }

    /// Sets a record's price.
    ///
    /// `Ok(false)` if the id is absent, `Err(Validation)` if the price is
    /// negative or not finite.
    pub fn update_price(&mut self, id: i64, price: f64) -> StoreResult<bool> {
        self.modify(id, "update_price", |r| r.set_price(price))
    }

    /// Renames a record, moving it between name index buckets.
    pub fn rename(&mut self, id: i64, name: &str) -> StoreResult<bool> {
        self.modify(id, "rename", |r| r.set_name(name))
    }

    /// Snapshot, mutate a copy, swap it in, persist; restore the snapshot on failure.
    fn modify<F>(&mut self, id: i64, op: &str, apply: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut Record) -> RecordResult<()>,
    {
        let Some(current) = self.records.get(&id) else {
            return Ok(false);
        };
        let snapshot = current.clone();
        let mut updated = snapshot.clone();
        apply(&mut updated)?;

        self.swap(&snapshot, updated);

        if let Err(e) = self.persist() {
            self.swap_back(snapshot);
            self.log_rollback(op, id);
            return Err(e);
        }
        Ok(true)
    }

    fn swap(&mut self, old: &Record, new: Record) {
        self.name_index.remove(old);
        self.name_index.add(&new);
        self.records.insert(new.id(), new);
    }

    fn swap_back(&mut self, snapshot: Record) {
        if let Some(updated) = self.records.insert(snapshot.id(), snapshot.clone()) {
            self.name_index.remove(&updated);
        }
        self.name_index.add(&snapshot);
    }

    // ---- persistence ----

    /// Rewrites the store file with the current state.
    pub fn save(&self) -> StoreResult<()> {
        self.persist()
    }

    /// Discards in-memory state and re-reads the store file.
    ///
    /// If the file cannot be read the current state is kept.
    pub fn reload(&mut self) -> StoreResult<()> {
        let loaded = self.read_image()?;
        self.install(loaded);
        self.log_loaded(Event::StoreReloaded);
        Ok(())
    }

    fn log_loaded(&self, event: Event) {
        let path = self.location_str();
        let records = self.records.len().to_string();
        let skipped = self.diagnostics.len().to_string();
        let replaced = self.replaced.to_string();
        log_event_with_fields(
            event,
            &[
                ("path", path.as_str()),
                ("records", records.as_str()),
                ("replaced", replaced.as_str()),
                ("skipped", skipped.as_str()),
            ],
        );
    }

    fn read_image(&self) -> StoreResult<Loaded> {
        match self.persister.read()? {
            Some(contents) => Ok(parse_image(&contents, self.format, &self.location_str())),
            None => Ok(Loaded::default()),
        }
    }

    fn install(&mut self, loaded: Loaded) {
        self.name_index = NameIndex::rebuild(loaded.records.values());
        self.records = loaded.records;
        self.diagnostics = loaded.diagnostics;
        self.replaced = loaded.replaced;
    }

    fn persist(&self) -> StoreResult<()> {
        let image = render_image(self.records.values(), self.format);
        match self.persister.write(image.as_bytes()) {
            Ok(()) => {
                let records = self.records.len().to_string();
                let bytes = image.len().to_string();
                log_event_with_fields(
                    Event::Persisted,
                    &[("bytes", bytes.as_str()), ("records", records.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                let path = self.location_str();
                let reason = e.to_string();
                log_event_with_fields(
                    Event::PersistFailed,
                    &[("path", path.as_str()), ("reason", reason.as_str())],
                );
                Err(e)
            }
        }
    }

    fn log_rollback(&self, op: &str, id: i64) {
        let id = id.to_string();
        log_event_with_fields(Event::RolledBack, &[("id", id.as_str()), ("op", op)]);
    }

    fn location_str(&self) -> String {
        self.persister.location().display().to_string()
    }

    // ---- reads ----

    /// Case-insensitive substring search on names, ascending by id.
    ///
    /// The pattern is trimmed; an empty pattern matches nothing.
    pub fn search_by_substring(&self, pattern: &str) -> Vec<&Record> {
        let needle = pattern.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .values()
            .filter(|r| r.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Exact (trimmed, case-folded) name lookup through the name index.
    pub fn search_by_exact_name(&self, name: &str) -> Vec<&Record> {
        self.name_index
            .lookup(name)
            .into_iter()
            .filter_map(|id| self.records.get(&id))
            .collect()
    }

    /// Every record as an owned row, ascending by id.
    pub fn list_all(&self) -> Vec<RecordRow> {
        self.records
            .values()
            .map(|r| (r.id(), r.name().to_string(), r.quantity(), r.price()))
            .collect()
    }

    /// Ids whose quantity is strictly below `threshold`.
    pub fn low_stock(&self, threshold: i64) -> BTreeSet<i64> {
        self.records
            .values()
            .filter(|r| r.quantity() < threshold)
            .map(Record::id)
            .collect()
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lines skipped by the most recent load
    pub fn diagnostics(&self) -> &[LoadDiagnostic] {
        &self.diagnostics
    }

    /// Lines of the most recent load that a later line with the same id overrode
    pub fn replaced_lines(&self) -> usize {
        self.replaced
    }

    pub fn location(&self) -> &Path {
        self.persister.location()
    }

    pub fn format(&self) -> EntryFormat {
        self.format
    }

    pub fn name_index(&self) -> &NameIndex {
        &self.name_index
    }

    /// True if the name index matches one rebuilt from the records.
    pub fn check_invariants(&self) -> bool {
        self.name_index == NameIndex::rebuild(self.records.values())
    }
}

impl<P: Persister> std::fmt::Debug for Store<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("location", &self.persister.location())
            .field("format", &self.format)
            .field("records", &self.records.len())
            .field("diagnostics", &self.diagnostics.len())
            .field("replaced", &self.replaced)
            .finish()
    }
}
