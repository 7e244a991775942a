//! CLI command implementations
//!
//! Each invocation opens the store, runs one command and exits. Mutating
//! commands are persisted before the process reports success.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::record::{EntryFormat, Record};
use crate::store::{Persister, Store, StoreConfig, StoreError};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::render::{rows_of, write_ids, write_table};

/// Configuration file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Store file (optional here, `--file` may supply it)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Line format (optional, default "delimited")
    #[serde(default)]
    pub format: EntryFormat,

    /// fsync the directory after each rename (optional, default true)
    #[serde(default = "default_sync_directory")]
    pub sync_directory: bool,

    /// Threshold for `low-stock` without `--threshold` (optional, default 5)
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sync_directory() -> bool {
    true
}
fn default_low_stock_threshold() -> i64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            format: EntryFormat::default(),
            sync_directory: default_sync_directory(),
            low_stock_threshold: default_low_stock_threshold(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let path = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> CliResult<()> {
        if self.low_stock_threshold < 0 {
            return Err(CliError::config_error(format!(
                "low_stock_threshold must be >= 0, got {}",
                self.low_stock_threshold
            )));
        }
        self.log_severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(CliError::config_error)
    }

    /// Store configuration; command-line overrides win over file values.
    pub fn store_config(
        &self,
        file: Option<PathBuf>,
        format: Option<EntryFormat>,
    ) -> CliResult<StoreConfig> {
        let path = file.or_else(|| self.data_file.clone()).ok_or_else(|| {
            CliError::config_error("no store file: pass --file or set data_file in --config")
        })?;

        Ok(StoreConfig::new(path)
            .with_format(format.unwrap_or(self.format))
            .with_sync_directory(self.sync_directory))
    }
}

/// Run a parsed command line
pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Logger::set_min_severity(config.log_severity()?);

    let store_config = config.store_config(cli.file, cli.format)?;
    let mut store = Store::open(store_config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&mut store, cli.command, &config, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Execute one command against an open store, writing results to `out`
pub fn execute<P: Persister, W: Write>(
    store: &mut Store<P>,
    command: Command,
    config: &Config,
    out: &mut W,
) -> CliResult<()> {
    match command {
        Command::Add {
            id,
            name,
            quantity,
            price,
        } => {
            let record = Record::new(id, &name, quantity, price).map_err(StoreError::from)?;
            if !store.insert(record)? {
                return Err(CliError::duplicate_id(id));
            }
            writeln!(out, "Added record {}.", id)?;
        }

        Command::Remove { id } => {
            if !store.delete(id)? {
                return Err(CliError::not_found(id));
            }
            writeln!(out, "Removed record {}.", id)?;
        }

        Command::SetQuantity { id, quantity } => {
            if !store.update_quantity(id, quantity)? {
                return Err(CliError::not_found(id));
            }
            writeln!(out, "Quantity of record {} set to {}.", id, quantity)?;
        }

        Command::SetPrice { id, price } => {
            if !store.update_price(id, price)? {
                return Err(CliError::not_found(id));
            }
            writeln!(out, "Price of record {} set to {:.2}.", id, price)?;
        }

        Command::Rename { id, name } => {
            if !store.rename(id, &name)? {
                return Err(CliError::not_found(id));
            }
            writeln!(out, "Record {} renamed.", id)?;
        }

        Command::Search { pattern } => {
            let found = store.search_by_substring(&pattern);
            write_table(out, &rows_of(&found), "No matching records.")?;
        }

        Command::Find { name } => {
            let found = store.search_by_exact_name(&name);
            write_table(out, &rows_of(&found), "No matching records.")?;
        }

        Command::List => {
            write_table(out, &store.list_all(), "Inventory is empty.")?;
        }

        Command::LowStock { threshold } => {
            let threshold = threshold.unwrap_or(config.low_stock_threshold);
            write_ids(out, &store.low_stock(threshold))?;
        }

        Command::Save => {
            store.save()?;
            writeln!(out, "Saved {} records to {}.", store.len(), store.location().display())?;
        }

        Command::Check => {
            for diagnostic in store.diagnostics() {
                writeln!(out, "skipped {}", diagnostic)?;
            }
            writeln!(
                out,
                "{} records, {} skipped lines, {} replaced lines, index {}.",
                store.len(),
                store.diagnostics().len(),
                store.replaced_lines(),
                if store.check_invariants() { "consistent" } else { "INCONSISTENT" }
            )?;
        }
    }

    Ok(())
}
