//! Crash-safe indexed record store
//!
//! The store keeps every record in memory, keyed by id, with a secondary
//! index on the case-folded name. Each mutation is persisted synchronously
//! by rewriting the whole file through a temp file and an atomic rename.
//!
//! # Design Principles
//!
//! - Whole-file rewrite, no append log
//! - Temp file in the target's own directory, fsynced before the rename
//! - In-memory change first, persist second, roll back on failure
//! - Corrupt lines are skipped on load, never fatal
//! - Latest line wins for a repeated id
//!
//! # Invariants Enforced
//!
//! - The name index holds exactly the ids whose folded name matches its key
//! - Reloading the file reproduces the records of the last successful persist
//! - A failed mutation leaves the store exactly as it was

mod config;
mod errors;
mod inventory;
mod loader;
mod persist;

pub use config::StoreConfig;
pub use errors::{PersistFailure, StoreError, StoreResult};
pub use inventory::{RecordRow, Store};
pub use loader::{parse_image, render_image, LoadDiagnostic, Loaded};
pub use persist::{AtomicFile, Persister, TEMP_PREFIX};
