//! Secondary indexes for stockpile
//!
//! Indexes are derived, in-memory-only state. The store rebuilds them from
//! its records on load and maintains them incrementally on every mutation.
//!
//! # Invariants
//!
//! - Every bucket holds exactly the ids whose folded name equals its key
//! - Empty buckets are removed
//! - Lookups return ids sorted ascending

mod name_index;

pub use name_index::NameIndex;
