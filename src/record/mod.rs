//! Inventory records
//!
//! A `Record` is the unit the store keeps: a positive id, a trimmed
//! non-empty name, a non-negative quantity and a non-negative finite price.
//! Validation happens at construction and in every setter.
//!
//! The codec turns one record into one line of a store file and back.

mod codec;
mod errors;
mod item;

pub use codec::{decode, encode, EntryFormat, DELIMITER};
pub use errors::{ParseError, RecordResult, ValidationError};
pub use item::{fold_name, Record};
