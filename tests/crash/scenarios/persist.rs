//! Persist crash scenarios
//!
//! - Crash before the rename: the previous image survives intact
//! - Crash after the rename: the new image is fully committed
//! - Either way the reopened file has no torn lines

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::crash::harness::{leftover_temp_files, reopen_rows, run_ok, run_stockpile};
use stockpile::crash_point::points;

fn seeded() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("inventory.txt");
    run_ok(
        &store,
        &["add", "--id", "1", "--name", "Widget", "--quantity", "10", "--price", "2.5"],
    );
    (dir, store)
}

fn crash_add(store: &Path, point: &str) {
    let result = run_stockpile(
        store,
        Some(point),
        &["add", "--id", "2", "--name", "Gadget", "--quantity", "3", "--price", "1"],
    );
    assert!(result.crashed, "process survived crash point {}", point);
    assert!(result.stderr.contains("[CRASH]"));
}

#[test]
fn test_crash_before_write_keeps_old_image() {
    let (_dir, store) = seeded();
    let before = fs::read(&store).unwrap();

    crash_add(&store, points::PERSIST_BEFORE_WRITE);

    assert_eq!(fs::read(&store).unwrap(), before);
    assert_eq!(reopen_rows(&store), vec![(1, "Widget".to_string(), 10, 2.5)]);
}

#[test]
fn test_crash_before_rename_keeps_old_image() {
    let (dir, store) = seeded();
    let before = fs::read(&store).unwrap();

    crash_add(&store, points::PERSIST_BEFORE_RENAME);

    assert_eq!(fs::read(&store).unwrap(), before);
    assert_eq!(reopen_rows(&store), vec![(1, "Widget".to_string(), 10, 2.5)]);
    // abort() skips temp file cleanup; the stray file must not disturb later writes
    assert_eq!(leftover_temp_files(dir.path()), 1);

    run_ok(&store, &["set-quantity", "--id", "1", "--quantity", "4"]);
    assert_eq!(reopen_rows(&store), vec![(1, "Widget".to_string(), 4, 2.5)]);
}

#[test]
fn test_crash_after_rename_commits_new_image() {
    let (_dir, store) = seeded();

    crash_add(&store, points::PERSIST_AFTER_RENAME);

    assert_eq!(
        reopen_rows(&store),
        vec![
            (1, "Widget".to_string(), 10, 2.5),
            (2, "Gadget".to_string(), 3, 1.0),
        ]
    );
}

#[test]
fn test_crash_during_first_persist_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("inventory.txt");

    crash_add(&store, points::PERSIST_BEFORE_RENAME);

    assert!(!store.exists());
    assert!(reopen_rows(&store).is_empty());
}

#[test]
fn test_unknown_point_is_ignored() {
    let (_dir, store) = seeded();
    let result = run_stockpile(&store, Some("no_such_point"), &["remove", "--id", "1"]);
    assert!(!result.crashed, "{}", result.stderr);
    assert!(reopen_rows(&store).is_empty());
}
