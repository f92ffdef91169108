//! Derived-column engine for the wide daily ephemeris table.
//!
//! A configuration table declares which columns to append: single-body
//! unwrapped longitudes and two-body synodic combinations, each resolved
//! through the frame's planet-to-column map. Every derived column reads only
//! the shared input rows and writes only its own output column, so the
//! columns are computed in parallel with rayon; the emitted order is the
//! configuration order regardless of scheduling.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;
use rayon::prelude::*;

use crate::config::{EphemerisConfig, Frame, PairColumn, SingleColumn};
use crate::core::loaders::{self, EphemerisTable};
use crate::core::transforms::{combine_series, unwrap_series};
use crate::core::writers;

/// One derived column to compute, in output order.
#[derive(Debug, Clone)]
enum ColumnJob {
    Single(SingleColumn),
    Pair(PairColumn),
}

impl ColumnJob {
    fn label(&self) -> String {
        match self {
            ColumnJob::Single(single) => single.label(),
            ColumnJob::Pair(pair) => pair.label(),
        }
    }
}

fn resolve_column(config: &EphemerisConfig, frame: Frame, body: &str) -> Result<usize> {
    config.column_for(frame, body).ok_or_else(|| {
        anyhow!(
            "no {} column configured for body '{}'",
            match frame {
                Frame::Geocentric => "geocentric",
                Frame::Heliocentric => "heliocentric",
            },
            body
        )
    })
}

fn compute_column(
    config: &EphemerisConfig,
    table: &EphemerisTable,
    job: &ColumnJob,
) -> Result<Vec<f64>> {
    match job {
        ColumnJob::Single(single) => {
            let column = resolve_column(config, single.frame, &single.body)?;
            let values = table
                .numeric_column(column)
                .with_context(|| format!("while computing column {}", single.label()))?;
            Ok(unwrap_series(&values))
        }
        ColumnJob::Pair(pair) => {
            let faster_col = resolve_column(config, pair.frame, &pair.faster)?;
            let slower_col = resolve_column(config, pair.frame, &pair.slower)?;
            let faster = table
                .numeric_column(faster_col)
                .with_context(|| format!("while computing column {}", pair.label()))?;
            let slower = table
                .numeric_column(slower_col)
                .with_context(|| format!("while computing column {}", pair.label()))?;
            Ok(combine_series(&faster, &slower))
        }
    }
}

/// Compute every configured derived column and append it to the table.
///
/// The header gains one label per derived column and every row gains the
/// corresponding cells, in configuration order: singles first, then pairs.
/// Nothing is appended unless every column succeeds.
pub fn extend_table(config: &EphemerisConfig, table: &mut EphemerisTable) -> Result<usize> {
    let jobs: Vec<ColumnJob> = config
        .singles
        .iter()
        .cloned()
        .map(ColumnJob::Single)
        .chain(config.pairs.iter().cloned().map(ColumnJob::Pair))
        .collect();

    // Columns are independent: read-only over the shared rows, write-only to
    // their own output. Only within a column does row order matter.
    let computed: Vec<(String, Vec<f64>)> = jobs
        .par_iter()
        .map(|job| {
            let label = job.label();
            info!("Calculating data for column: {}", label);
            let series = compute_column(config, table, job)?;
            Ok((label, series))
        })
        .collect::<Result<_>>()?;

    for (label, series) in &computed {
        debug_assert_eq!(series.len(), table.num_rows());
        table.header.push(label.clone());
        for (row, value) in table.rows.iter_mut().zip(series.iter()) {
            row.push(format!("{}", value));
        }
    }

    Ok(computed.len())
}

/// Summary of a completed ephemeris run.
#[derive(Debug, Clone, Copy)]
pub struct EphemerisSummary {
    pub rows: usize,
    pub derived_columns: usize,
}

/// Run the full ephemeris pipeline: load, extend, write.
///
/// The whole input is read and every derived column computed before the
/// output file is created, so a failing run never produces a partial file.
pub fn run_ephemeris(
    input: &Path,
    output: &Path,
    config: &EphemerisConfig,
) -> Result<EphemerisSummary> {
    info!("Reading from input file: {}", input.display());
    let mut table = loaders::load_ephemeris_csv(input)
        .with_context(|| format!("failed to load ephemeris table from {}", input.display()))?;

    let derived_columns = extend_table(config, &mut table)?;

    info!("Writing to output file: {}", output.display());
    writers::write_ephemeris_csv(output, &table.header, &table.rows)
        .with_context(|| format!("failed to write ephemeris table to {}", output.display()))?;

    Ok(EphemerisSummary {
        rows: table.num_rows(),
        derived_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn small_config() -> EphemerisConfig {
        let mut geocentric = HashMap::new();
        geocentric.insert("Moon".to_string(), 1);
        geocentric.insert("Sun".to_string(), 2);

        EphemerisConfig {
            geocentric_columns: geocentric,
            heliocentric_columns: HashMap::new(),
            singles: vec![SingleColumn {
                frame: Frame::Geocentric,
                body: "Moon".to_string(),
            }],
            pairs: vec![PairColumn {
                frame: Frame::Geocentric,
                faster: "Moon".to_string(),
                slower: "Sun".to_string(),
            }],
        }
    }

    fn small_table() -> EphemerisTable {
        EphemerisTable {
            header: vec!["Date".into(), "G.Moon.raw".into(), "G.Sun.raw".into()],
            rows: vec![
                vec!["01/05/2009".into(), "350".into(), "284".into()],
                vec!["01/06/2009".into(), "355".into(), "285".into()],
                vec!["01/07/2009".into(), "2".into(), "286".into()],
            ],
        }
    }

    #[test]
    fn test_extend_table_appends_labels_and_cells() {
        let config = small_config();
        let mut table = small_table();

        let count = extend_table(&config, &mut table).unwrap();
        assert_eq!(count, 2);

        assert_eq!(
            table.header,
            vec!["Date", "G.Moon.raw", "G.Sun.raw", "G.Moon", "G.Moon/G.Sun"]
        );
        for row in &table.rows {
            assert_eq!(row.len(), 5);
        }

        // Unwrapped Moon: wrap at row 3 adds one period.
        assert_eq!(table.rows[0][3], "350");
        assert_eq!(table.rows[1][3], "355");
        assert_eq!(table.rows[2][3], "362");

        // Combined Moon/Sun: 350+360-284, 355+360-285, then the wrap is
        // corrected: 2+360-286 = 76 -> 436.
        assert_eq!(table.rows[0][4], "426");
        assert_eq!(table.rows[1][4], "430");
        assert_eq!(table.rows[2][4], "436");
    }

    #[test]
    fn test_extend_table_preserves_original_cells() {
        let config = small_config();
        let mut table = small_table();
        let original_rows = table.rows.clone();

        extend_table(&config, &mut table).unwrap();

        for (row, original) in table.rows.iter().zip(original_rows.iter()) {
            assert_eq!(&row[..original.len()], &original[..]);
        }
    }

    #[test]
    fn test_extend_table_unknown_body() {
        let mut config = small_config();
        config.singles.push(SingleColumn {
            frame: Frame::Geocentric,
            body: "Vulcan".to_string(),
        });
        let mut table = small_table();

        let err = extend_table(&config, &mut table).unwrap_err();
        assert!(err.to_string().contains("Vulcan"));
    }

    #[test]
    fn test_extend_table_non_numeric_cell_aborts() {
        let config = small_config();
        let mut table = small_table();
        table.rows[1][1] = "n/a".to_string();

        let err = extend_table(&config, &mut table).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 3"));
        assert!(message.contains("column 1"));
    }

    #[test]
    fn test_extend_table_empty_table() {
        let config = small_config();
        let mut table = EphemerisTable {
            header: vec!["Date".into(), "a".into(), "b".into()],
            rows: vec![],
        };

        let count = extend_table(&config, &mut table).unwrap();
        assert_eq!(count, 2);
        assert_eq!(table.header.len(), 5);
    }
}
