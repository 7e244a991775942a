//! CLI module for stockpile
//!
//! Provides a one-shot command-line interface over a store file:
//! - add, remove, set-quantity, set-price, rename: persisted mutations
//! - search, find, list, low-stock: read-only queries
//! - save, check: rewrite the file, report skipped lines

mod args;
mod commands;
mod errors;
mod render;

pub use args::{Cli, Command};
pub use commands::{execute, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse the process arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}
