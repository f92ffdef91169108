//! Data writers for the two output CSV formats.
//!
//! - Weekly price-bar CSV: quoted header, CRLF line endings
//! - Extended ephemeris CSV: original header plus derived column labels,
//!   newline-terminated UTF-8
//!
//! Both writers are only invoked once the full input has been parsed and
//! transformed, so a failing run never leaves a partially written output file
//! behind it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::loaders::WeeklyBar;

/// Header line of the weekly output file.
pub const WEEKLY_HEADER: &str = "\"Date\",\"Open\",\"High\",\"Low\",\"Close\",\"Volume\",\"OpenInt\"";

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path, truncating any existing file.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Formats a price so integral values print without a trailing fraction.
fn format_price(value: f64) -> String {
    format!("{}", value)
}

/// Write weekly price bars to CSV.
///
/// Output format: [`WEEKLY_HEADER`] followed by one comma-separated row per
/// week, with Windows (CRLF) line endings throughout, matching the downstream
/// charting tool's expectations.
pub fn write_weekly_csv(path: &Path, bars: &[WeeklyBar]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;
    let path_str = path.display().to_string();

    let mut emit = |line: &str| -> Result<()> {
        write!(writer, "{}\r\n", line).map_err(|e| WriteError::WriteFile {
            path: path_str.clone(),
            source: e,
        })
    };

    emit(WEEKLY_HEADER)?;
    for bar in bars {
        emit(&format!(
            "{},{},{},{},{},{},{}",
            bar.date_text,
            format_price(bar.open),
            format_price(bar.high),
            format_price(bar.low),
            format_price(bar.close),
            bar.volume,
            bar.open_interest
        ))?;
    }

    writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Write an extended ephemeris table to CSV.
///
/// The header cells and every row's cells are joined with commas and
/// terminated with `\n`. Cells are written verbatim: original columns pass
/// through untouched and derived cells were already rendered to text by the
/// engine.
pub fn write_ephemeris_csv(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;
    let path_str = path.display().to_string();

    let mut emit = |cells: &[String]| -> Result<()> {
        writeln!(writer, "{}", cells.join(",")).map_err(|e| WriteError::WriteFile {
            path: path_str.clone(),
            source: e,
        })
    };

    emit(header)?;
    for row in rows {
        emit(row)?;
    }

    writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}
