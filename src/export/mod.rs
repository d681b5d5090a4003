//! Export Module
//!
//! History and result output for the CLI (table, JSON, CSV) and the TUI's
//! export key, which writes timestamped CSV files to `<data dir>/exports/`.

mod csv_export;
mod json_export;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};

use crate::domain::HistoryEntry;
use crate::ui::format::{format_balance, time_ago};

pub use json_export::{write_value, ExportableResult, ExportableStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Table,
    Json,
    Csv,
}

/// Write the history to `out` in the requested format
pub fn write_history<W: Write>(
    mut out: W,
    entries: &[HistoryEntry],
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<usize> {
    match format {
        ExportFormat::Json => json_export::write_history(out, entries),
        ExportFormat::Csv => csv_export::write_history(out, entries),
        ExportFormat::Table => {
            if entries.is_empty() {
                writeln!(out, "No queries yet")?;
                return Ok(0);
            }
            writeln!(out, "{:<42}  {:>20}  {}", "ADDRESS", "BALANCE (TARA)", "WHEN")?;
            for entry in entries {
                writeln!(
                    out,
                    "{:<42}  {:>20}  {}",
                    entry.address,
                    format_balance(entry.balance_decimal, 4),
                    time_ago(entry.queried_at, now)
                )?;
            }
            Ok(entries.len())
        }
    }
}

/// Generate a timestamped filename
fn generate_filename(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.{}", prefix, timestamp, extension)
}

/// Write the history as CSV into `dir`, creating it if needed. Returns the
/// file written.
pub fn export_history_csv(dir: &Path, entries: &[HistoryEntry]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(generate_filename("history", "csv"));
    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    csv_export::write_history(file, entries)?;
    Ok(path)
}
