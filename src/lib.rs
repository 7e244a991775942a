//! stockpile - a crash-safe indexed record store
//!
//! Records (id, name, quantity, price) live in memory, keyed by id and
//! indexed by case-folded name. Every mutation rewrites the backing file
//! atomically before it is acknowledged.

pub mod cli;
pub mod crash_point;
pub mod index;
pub mod observability;
pub mod record;
pub mod store;
