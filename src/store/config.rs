//! Store configuration
//!
//! There is no default location: every store is opened against an explicit
//! file path.

use std::path::{Component, Path, PathBuf};

use crate::record::EntryFormat;

use super::errors::{StoreError, StoreResult};

/// How and where a file-backed store persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Target file; the temp file for atomic rewrites is created beside it
    pub path: PathBuf,
    /// Line format of the file
    pub format: EntryFormat,
    /// fsync the parent directory after the rename
    pub sync_directory: bool,
}

impl StoreConfig {
    /// Config for the given file with the delimited format and directory sync on.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: EntryFormat::default(),
            sync_directory: true,
        }
    }

    pub fn with_format(mut self, format: EntryFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sync_directory(mut self, sync_directory: bool) -> Self {
        self.sync_directory = sync_directory;
        self
    }

    /// The path must name a file, not a directory-like component.
    pub fn validate(&self) -> StoreResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::Config("store path is empty".to_string()));
        }
        if !ends_in_file_name(&self.path) {
            return Err(StoreError::Config(format!(
                "store path does not name a file: {}",
                self.path.display()
            )));
        }
        Ok(())
    }
}

fn ends_in_file_name(path: &Path) -> bool {
    matches!(path.components().next_back(), Some(Component::Normal(_)))
        && !path.as_os_str().to_string_lossy().ends_with(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("inventory.txt");
        assert_eq!(config.format, EntryFormat::Delimited);
        assert!(config.sync_directory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = StoreConfig::new("data/inventory.jsonl")
            .with_format(EntryFormat::JsonLines)
            .with_sync_directory(false);
        assert_eq!(config.format, EntryFormat::JsonLines);
        assert!(!config.sync_directory);
    }

    #[test]
    fn test_rejects_empty_path() {
        assert!(matches!(
            StoreConfig::new("").validate(),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_directory_like_paths() {
        for path in ["data/", "..", "/", "data/.."] {
            assert!(
                StoreConfig::new(path).validate().is_err(),
                "{} should be rejected",
                path
            );
        }
    }
}
