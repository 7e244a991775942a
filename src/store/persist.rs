//! Atomic whole-file persistence
//!
//! Every persist rewrites the full store image:
//! 1. Create a uniquely named temp file in the target's directory
//! 2. Write the image and fsync the temp file
//! 3. Rename the temp file over the target (atomic on POSIX and NTFS)
//! 4. fsync the directory so the rename itself is durable
//!
//! A crash before step 3 leaves the previous target untouched; a crash
//! after it leaves the new image fully committed. The temp file must live
//! in the same directory as the target, otherwise the rename may cross
//! filesystems and stop being atomic.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::crash_point::{maybe_crash, points};
use crate::observability::{log_event_with_fields, Event};

use super::errors::{StoreError, StoreResult};

/// Prefix of temp files created next to the target
pub const TEMP_PREFIX: &str = ".stockpile-";

/// Durable home of a store image.
pub trait Persister {
    /// Where the image lives, for diagnostics
    fn location(&self) -> &Path;

    /// Reads the committed image. `Ok(None)` if nothing was ever committed.
    fn read(&self) -> StoreResult<Option<String>>;

    /// Replaces the committed image with `contents`, all or nothing.
    fn write(&self, contents: &[u8]) -> StoreResult<()>;
}

/// Persister that rewrites a single file through temp file + rename.
#[derive(Debug, Clone)]
pub struct AtomicFile {
    path: PathBuf,
    sync_directory: bool,
}

impl AtomicFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_directory: true,
        }
    }

    /// Enables or disables the directory fsync after rename
    pub fn sync_directory(mut self, enabled: bool) -> Self {
        self.sync_directory = enabled;
        self
    }

    /// Directory holding the target (and every temp file)
    fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn failed(&self, source: io::Error) -> StoreError {
        StoreError::persistence(&self.path, source)
    }
}

impl Persister for AtomicFile {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::read(&self.path, e)),
        }
    }

    fn write(&self, contents: &[u8]) -> StoreResult<()> {
        let dir = self.directory();
        fs::create_dir_all(&dir).map_err(|e| self.failed(e))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(".tmp");
        // Same mode a plain `File::create` would get, before the umask
        #[cfg(unix)]
        builder.permissions(new_file_permissions());

        // Removed on drop unless persisted
        let mut tmp = builder.tempfile_in(&dir).map_err(|e| self.failed(e))?;

        // The rename replaces the target's inode; carry its mode over
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_file() => tmp
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| self.failed(e))?,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.failed(e)),
        }

        maybe_crash(points::PERSIST_BEFORE_WRITE);

        tmp.write_all(contents).map_err(|e| self.failed(e))?;
        tmp.as_file().sync_all().map_err(|e| self.failed(e))?;

        maybe_crash(points::PERSIST_BEFORE_RENAME);

        tmp.persist(&self.path).map_err(|e| self.failed(e.error))?;

        maybe_crash(points::PERSIST_AFTER_RENAME);

        // The rename has committed. A directory fsync failure is logged but
        // not returned: the caller would roll memory back behind a file that
        // already holds the new image.
        if self.sync_directory {
            if let Err(e) = sync_dir(&dir) {
                let path = self.path.display().to_string();
                let reason = e.to_string();
                log_event_with_fields(
                    Event::DirSyncFailed,
                    &[("path", path.as_str()), ("reason", reason.as_str())],
                );
            }
        }

        Ok(())
    }
}

#[cfg(unix)]
fn new_file_permissions() -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(0o666)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

// Directories cannot be opened for fsync on Windows; NTFS journals the rename.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
