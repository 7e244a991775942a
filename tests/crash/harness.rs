//! Crash test harness for subprocess management
//!
//! Runs the `stockpile` binary against a store file, optionally with a
//! crash point armed, and reports how the process ended.

use std::path::Path;
use std::process::{Command, ExitStatus};

use stockpile::crash_point::CRASH_POINT_ENV;
use stockpile::store::{Store, StoreConfig, TEMP_PREFIX};

/// Result of a crash test execution
#[derive(Debug)]
pub struct CrashTestResult {
    /// Whether the process ended without a successful exit
    pub crashed: bool,
    /// Exit status if available
    pub exit_status: Option<ExitStatus>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `stockpile --file <store> <args...>`, with `crash_point` armed if given.
pub fn run_stockpile(store: &Path, crash_point: Option<&str>, args: &[&str]) -> CrashTestResult {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stockpile"));
    command.arg("--file").arg(store).args(args);
    command.env_remove(CRASH_POINT_ENV);
    if let Some(point) = crash_point {
        command.env(CRASH_POINT_ENV, point);
    }

    match command.output() {
        Ok(output) => CrashTestResult {
            crashed: !output.status.success(),
            exit_status: Some(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        },
        Err(e) => CrashTestResult {
            crashed: true,
            exit_status: None,
            stdout: String::new(),
            stderr: format!("Failed to execute: {}", e),
        },
    }
}

/// Runs a command that must succeed
pub fn run_ok(store: &Path, args: &[&str]) -> String {
    let result = run_stockpile(store, None, args);
    assert!(!result.crashed, "command {:?} failed: {}", args, result.stderr);
    result.stdout
}

/// Reopens the store in-process and returns its rows
pub fn reopen_rows(store: &Path) -> Vec<(i64, String, i64, f64)> {
    let store = Store::open(StoreConfig::new(store)).expect("reopen after crash");
    assert!(store.diagnostics().is_empty(), "crash left a torn line");
    assert!(store.check_invariants());
    store.list_all()
}

/// Temp files left beside the target
pub fn leftover_temp_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("read store dir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
        .count()
}
