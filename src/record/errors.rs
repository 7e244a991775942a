//! Record error types
//!
//! Error codes:
//! - STOCK_VALIDATION_FAILED: a field value is outside its domain
//! - STOCK_ENTRY_MALFORMED: a persisted entry could not be decoded

use thiserror::Error;

/// A field value rejected by record validation.
///
/// Returned by construction and by every mutator. The record is never
/// modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("id must be a positive integer, got {0}")]
    NonPositiveId(i64),

    #[error("name must not be empty")]
    EmptyName,

    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(i64),

    #[error("price must not be negative, got {0}")]
    NegativePrice(f64),

    #[error("price must be a finite number")]
    NonNumericPrice,
}

impl ValidationError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "STOCK_VALIDATION_FAILED"
    }
}

/// A persisted entry that could not be turned back into a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field '{field}' is not numeric: '{value}'")]
    NonNumeric { field: &'static str, value: String },

    #[error("invalid escape sequence in name")]
    BadEscape,

    #[error("malformed JSON entry: {0}")]
    Json(String),

    #[error("entry holds an invalid value: {0}")]
    Invalid(#[from] ValidationError),
}

impl ParseError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "STOCK_ENTRY_MALFORMED"
    }
}

/// Result type for record validation
pub type RecordResult<T> = Result<T, ValidationError>;
