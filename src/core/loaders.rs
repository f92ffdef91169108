//! Data loaders for daily price-bar and ephemeris CSV files.
//!
//! This module provides parsers for:
//! - Daily OHLCV price-bar CSV files (7 fixed columns, MM/DD/YYYY dates)
//! - Wide daily ephemeris CSV files (planetary longitudes at fixed column offsets)

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::ReaderBuilder;
use thiserror::Error;

/// Number of fields expected in each daily price-bar row.
const PRICE_BAR_FIELDS: usize = 7;

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input file does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Format error at line {line}: {message}")]
    Format { line: u64, message: String },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// One daily OHLCV price bar.
///
/// `date_text` keeps the verbatim 10-character input date so the weekly
/// output can reproduce the input formatting exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    /// 1-based line number in the source file, for diagnostics.
    pub line: u64,
    pub date: NaiveDate,
    pub date_text: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub open_interest: i64,
}

/// One aggregated weekly bar, produced by the weekly fold.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyBar {
    /// Verbatim date text of the first daily bar in the week.
    pub date_text: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub open_interest: i64,
}

/// Wide ephemeris table: header names plus rows of raw cell text.
///
/// Original cells pass through untouched; derived columns are appended,
/// never written back into existing cells.
#[derive(Debug, Clone, Default)]
pub struct EphemerisTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl EphemerisTable {
    /// Returns the number of data rows (header excluded).
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Parses one column of the table as `f64` values.
    ///
    /// The reported line number accounts for the header line, so it matches
    /// the physical line in the source file.
    pub fn numeric_column(&self, column: usize) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let line = i as u64 + 2;
            let cell = row.get(column).ok_or_else(|| LoaderError::Format {
                line,
                message: format!("missing cell in column {}", column),
            })?;
            let value: f64 = cell.trim().parse().map_err(|_| LoaderError::Format {
                line,
                message: format!("non-numeric value '{}' in column {}", cell, column),
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

fn require_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Load daily price bars from a CSV file.
///
/// The expected format:
/// - Header row (skipped)
/// - 7 columns: Date (MM/DD/YYYY, exactly 10 characters), Open, High, Low,
///   Close, Volume (integer), OpenInt (integer)
/// - Rows ordered oldest to newest (ordering is validated by the aggregator,
///   not here)
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or any row
/// has the wrong field count, a malformed date, or a non-numeric field. The
/// error message names the offending source line.
pub fn load_daily_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceBar>> {
    let path = path.as_ref();
    require_exists(path)?;

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut bars = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        if record.len() != PRICE_BAR_FIELDS {
            return Err(LoaderError::Format {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    PRICE_BAR_FIELDS,
                    record.len()
                ),
            });
        }

        let date_text = record.get(0).unwrap_or("").trim().to_string();
        if date_text.len() != 10 {
            return Err(LoaderError::Format {
                line,
                message: format!("date '{}' is not 10 characters", date_text),
            });
        }
        let date =
            NaiveDate::parse_from_str(&date_text, "%m/%d/%Y").map_err(|_| LoaderError::Format {
                line,
                message: format!("date '{}' is not in MM/DD/YYYY format", date_text),
            })?;

        let price = |idx: usize, name: &str| -> Result<f64> {
            let cell = record.get(idx).unwrap_or("").trim();
            cell.parse().map_err(|_| LoaderError::Format {
                line,
                message: format!("non-numeric {} value '{}'", name, cell),
            })
        };
        let integer = |idx: usize, name: &str| -> Result<i64> {
            let cell = record.get(idx).unwrap_or("").trim();
            cell.parse().map_err(|_| LoaderError::Format {
                line,
                message: format!("non-integer {} value '{}'", name, cell),
            })
        };

        bars.push(PriceBar {
            line,
            date,
            date_text,
            open: price(1, "open")?,
            high: price(2, "high")?,
            low: price(3, "low")?,
            close: price(4, "close")?,
            volume: integer(5, "volume")?,
            open_interest: integer(6, "open interest")?,
        });
    }

    Ok(bars)
}

/// Load a wide ephemeris CSV into memory.
///
/// The first line is the header; every following non-empty line becomes a row
/// of raw cell text. No numeric parsing happens here: cells are only parsed
/// when a derived column reads them, so columns the configuration never
/// touches may hold arbitrary text.
pub fn load_ephemeris_csv<P: AsRef<Path>>(path: P) -> Result<EphemerisTable> {
    let path = path.as_ref();
    require_exists(path)?;

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let header: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(EphemerisTable { header, rows })
}
