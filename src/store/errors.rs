//! Store error types
//!
//! Error codes:
//! - STOCK_PERSIST_FAILED: the atomic rewrite of the store file failed; the
//!   in-memory state has already been rolled back
//! - STOCK_READ_FAILED: the store file exists but could not be read
//! - STOCK_VALIDATION_FAILED: a new field value was rejected
//! - STOCK_CONFIG_INVALID: the store was opened with an unusable configuration

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::ValidationError;

/// Why a persist attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistFailure {
    /// The directory or target file is not writable
    PermissionDenied,
    /// The device has no space left
    StorageFull,
    /// Any other I/O failure
    Io,
}

impl PersistFailure {
    /// Classifies an I/O error
    pub fn classify(err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            PersistFailure::PermissionDenied
        } else if is_storage_full(err) {
            PersistFailure::StorageFull
        } else {
            PersistFailure::Io
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistFailure::PermissionDenied => "permission denied",
            PersistFailure::StorageFull => "storage full",
            PersistFailure::Io => "i/o failure",
        }
    }
}

impl fmt::Display for PersistFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_storage_full(err: &io::Error) -> bool {
    let Some(code) = err.raw_os_error() else {
        return false;
    };
    if cfg!(windows) {
        // ERROR_DISK_FULL, ERROR_HANDLE_DISK_FULL
        code == 112 || code == 39
    } else {
        // ENOSPC
        code == 28
    }
}

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist {} ({kind}): {source}", .path.display())]
    Persistence {
        kind: PersistFailure,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a persistence error, classifying the I/O cause
    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Persistence {
            kind: PersistFailure::classify(&source),
            path: path.into(),
            source,
        }
    }

    /// Create a read error
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Persistence { .. } => "STOCK_PERSIST_FAILED",
            StoreError::Read { .. } => "STOCK_READ_FAILED",
            StoreError::Validation(e) => e.code(),
            StoreError::Config(_) => "STOCK_CONFIG_INVALID",
        }
    }

    /// Returns the persist failure class, if this is a persistence error
    pub fn persist_failure(&self) -> Option<PersistFailure> {
        match self {
            StoreError::Persistence { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
