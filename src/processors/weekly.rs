//! Daily-to-weekly price-bar aggregation.
//!
//! Consecutive daily bars are grouped by ISO-8601 calendar week (Monday
//! start, week 1 contains the year's first Thursday) and folded into one
//! weekly bar per group. The input must be ordered oldest to newest; a bar
//! whose week key precedes the open bucket's key aborts the run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use log::{debug, info};
use thiserror::Error;

use crate::core::loaders::{self, PriceBar, WeeklyBar};
use crate::core::writers;

/// Errors specific to the weekly aggregation fold.
#[derive(Error, Debug)]
pub enum WeeklyError {
    #[error("input is not in chronological order at line {line} (date {date})")]
    Ordering { line: u64, date: String },
}

/// ISO (year, week) key. Lexicographic comparison matches chronological
/// order across year boundaries.
type WeekKey = (i32, u32);

fn week_key(bar: &PriceBar) -> WeekKey {
    let iso = bar.date.iso_week();
    (iso.year(), iso.week())
}

/// Accumulator for the week currently being folded.
struct WeekBucket {
    key: WeekKey,
    bar: WeeklyBar,
}

impl WeekBucket {
    fn open(daily: &PriceBar) -> Self {
        let prices = [daily.open, daily.high, daily.low, daily.close];
        Self {
            key: week_key(daily),
            bar: WeeklyBar {
                date_text: daily.date_text.clone(),
                open: daily.open,
                high: prices.iter().cloned().fold(f64::MIN, f64::max),
                low: prices.iter().cloned().fold(f64::MAX, f64::min),
                close: daily.close,
                volume: daily.volume,
                open_interest: daily.open_interest,
            },
        }
    }

    /// Folds a same-week daily bar into the bucket. The extrema consider all
    /// four price fields of the new bar, not only its high and low.
    fn fold(&mut self, daily: &PriceBar) {
        let prices = [daily.open, daily.high, daily.low, daily.close];
        for &p in &prices {
            if p > self.bar.high {
                self.bar.high = p;
            }
            if p < self.bar.low {
                self.bar.low = p;
            }
        }
        self.bar.close = daily.close;
        self.bar.volume += daily.volume;
        self.bar.open_interest = daily.open_interest;
    }
}

/// Fold ordered daily bars into weekly bars, one per distinct ISO week.
///
/// # Errors
///
/// Returns [`WeeklyError::Ordering`] if a bar's week key is strictly earlier
/// than the open bucket's key.
pub fn aggregate_weekly(bars: &[PriceBar]) -> std::result::Result<Vec<WeeklyBar>, WeeklyError> {
    let mut weeks = Vec::new();
    let mut bucket: Option<WeekBucket> = None;

    for bar in bars {
        let key = week_key(bar);
        match bucket.as_mut() {
            None => {
                debug!("opening first week bucket at {}", bar.date_text);
                bucket = Some(WeekBucket::open(bar));
            }
            Some(current) if key == current.key => {
                debug!("date {} is within the same week", bar.date_text);
                current.fold(bar);
            }
            Some(current) if key > current.key => {
                debug!("date {} starts a new week", bar.date_text);
                let finished = std::mem::replace(current, WeekBucket::open(bar));
                weeks.push(finished.bar);
            }
            Some(_) => {
                return Err(WeeklyError::Ordering {
                    line: bar.line,
                    date: bar.date_text.clone(),
                });
            }
        }
    }

    if let Some(open) = bucket {
        weeks.push(open.bar);
    }

    Ok(weeks)
}

/// Summary of a completed weekly aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct WeeklySummary {
    pub daily_bars: usize,
    pub weekly_bars: usize,
}

/// Run the full daily-to-weekly pipeline: load, fold, write.
///
/// The input is fully parsed and aggregated before the output file is
/// created, so a failing run never produces a partial output file.
pub fn run_weekly(input: &Path, output: &Path) -> Result<WeeklySummary> {
    info!("Reading daily bars from: {}", input.display());
    let bars = loaders::load_daily_csv(input)
        .with_context(|| format!("failed to load daily bars from {}", input.display()))?;

    let weeks = aggregate_weekly(&bars)?;
    info!("Total number of weeks in output file: {}", weeks.len());

    writers::write_weekly_csv(output, &weeks)
        .with_context(|| format!("failed to write weekly bars to {}", output.display()))?;

    Ok(WeeklySummary {
        daily_bars: bars.len(),
        weekly_bars: weeks.len(),
    })
}
