//! Crash testing framework for stockpile
//!
//! - Crash injection at deterministic points via `STOCKPILE_CRASH_POINT`
//! - Subprocess management
//! - Post-crash validation by reopening the store

pub mod harness;
pub mod scenarios;
