//! Crash point injection for durability testing
//!
//! Crash points are enabled via the `STOCKPILE_CRASH_POINT` environment
//! variable. When the named point is reached the process terminates through
//! `std::process::abort()`: no cleanup, no unwinding, no destructors, so a
//! half-written temporary file stays exactly as the crash left it.
//!
//! # Usage
//!
//! ```ignore
//! use stockpile::crash_point::{maybe_crash, points};
//!
//! maybe_crash(points::PERSIST_BEFORE_RENAME);
//! ```
//!
//! ```bash
//! STOCKPILE_CRASH_POINT=persist_before_rename stockpile --file inv.txt add ...
//! ```

use std::sync::OnceLock;

/// Environment variable naming the active crash point
pub const CRASH_POINT_ENV: &str = "STOCKPILE_CRASH_POINT";

/// Cache the crash point name to avoid repeated env var lookups
static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `STOCKPILE_CRASH_POINT` equals the given name.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Abort the process if the named crash point is enabled.
///
/// No-op when `STOCKPILE_CRASH_POINT` is unset or names another point.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    /// Temp file created, nothing written yet
    pub const PERSIST_BEFORE_WRITE: &str = "persist_before_write";
    /// Temp file written and fsynced, target not yet replaced
    pub const PERSIST_BEFORE_RENAME: &str = "persist_before_rename";
    /// Target replaced, directory not yet fsynced
    pub const PERSIST_AFTER_RENAME: &str = "persist_after_rename";

    /// Get all crash point names
    pub fn all() -> &'static [&'static str] {
        &[PERSIST_BEFORE_WRITE, PERSIST_BEFORE_RENAME, PERSIST_AFTER_RENAME]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_point_disabled_by_default() {
        assert!(!crash_point_enabled("test_point"));
    }

    #[test]
    fn test_all_crash_points_defined() {
        let all = points::all();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&"persist_before_rename"));
    }

    #[test]
    fn test_crash_point_names_are_lowercase_with_underscores() {
        for point in points::all() {
            assert!(
                point.chars().all(|c| c.is_lowercase() || c == '_'),
                "Crash point '{}' should be lowercase with underscores",
                point
            );
        }
    }
}
