//! CLI argument definitions using clap
//!
//! Commands:
//! - stockpile add --id <id> --name <name> --quantity <n> --price <p>
//! - stockpile remove --id <id>
//! - stockpile set-quantity --id <id> --quantity <n>
//! - stockpile set-price --id <id> --price <p>
//! - stockpile rename --id <id> --name <name>
//! - stockpile search <pattern>
//! - stockpile find <name>
//! - stockpile list
//! - stockpile low-stock [--threshold <n>]
//! - stockpile save
//! - stockpile check
//!
//! Every command needs a store file, from `--file` or from `data_file` in
//! the `--config` JSON.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::record::EntryFormat;

/// stockpile - crash-safe inventory record store
#[derive(Parser, Debug)]
#[command(name = "stockpile")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file (overrides `data_file` from the configuration)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Line format of the store file: delimited or json-lines
    #[arg(long, global = true)]
    pub format: Option<EntryFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a new record
    Add {
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },

    /// Delete a record by id
    Remove {
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
    },

    /// Set the quantity of a record
    SetQuantity {
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Set the price of a record
    SetPrice {
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },

    /// Rename a record
    Rename {
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        #[arg(long)]
        name: String,
    },

    /// Case-insensitive substring search on names
    Search {
        pattern: String,
    },

    /// Exact (case-insensitive) name lookup
    Find {
        name: String,
    },

    /// List every record by id
    List,

    /// List ids whose quantity is below a threshold
    LowStock {
        /// Defaults to `low_stock_threshold` from the configuration
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i64>,
    },

    /// Rewrite the store file from the loaded state
    Save,

    /// Load the store and report skipped lines
    Check,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
