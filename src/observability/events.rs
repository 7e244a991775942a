//! Observability events for stockpile
//!
//! Every line the store logs is one of these events. Events are explicit
//! and typed; each carries its own severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the store lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Load
    /// Store file loaded (or found absent) and indexes built
    StoreOpened,
    /// A malformed entry was skipped during load
    EntrySkipped,
    /// Store re-read from disk on request
    StoreReloaded,

    // Persist
    /// Full store image committed by atomic rename
    Persisted,
    /// Persist failed; the committed file is untouched
    PersistFailed,
    /// In-memory state restored after a failed persist
    RolledBack,
    /// Rename committed but the directory fsync failed
    DirSyncFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::EntrySkipped => "STORE_ENTRY_SKIPPED",
            Event::StoreReloaded => "STORE_RELOADED",
            Event::Persisted => "STORE_PERSISTED",
            Event::PersistFailed => "STORE_PERSIST_FAILED",
            Event::RolledBack => "STORE_ROLLED_BACK",
            Event::DirSyncFailed => "STORE_DIR_SYNC_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::Persisted => Severity::Trace,
            Event::ConfigLoaded | Event::StoreOpened | Event::StoreReloaded => Severity::Info,
            Event::EntrySkipped | Event::RolledBack | Event::DirSyncFailed => Severity::Warn,
            Event::PersistFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::StoreOpened,
            Event::EntrySkipped,
            Event::StoreReloaded,
            Event::Persisted,
            Event::PersistFailed,
            Event::RolledBack,
            Event::DirSyncFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severities() {
        assert_eq!(Event::PersistFailed.severity(), Severity::Error);
        assert_eq!(Event::EntrySkipped.severity(), Severity::Warn);
        assert_eq!(Event::StoreOpened.severity(), Severity::Info);
        assert!(Event::Persisted.severity() < Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::RolledBack), "STORE_ROLLED_BACK");
    }
}
