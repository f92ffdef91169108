//! End-to-end tests driving both pipelines through real files.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use cycle_pipeline::config::{EphemerisConfig, Frame, PairColumn, SingleColumn};
use cycle_pipeline::processors::{run_ephemeris, run_weekly};

fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[test]
fn weekly_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "daily.csv",
        &[
            "\"Date\",\"Open\",\"High\",\"Low\",\"Close\",\"Volume\",\"OpenInt\"",
            "01/05/2009,10,12,9,11,100,500",
            "01/06/2009,12,13,10,11.5,200,505",
            "01/07/2009,9,10,8,9.5,150,510",
            "01/08/2009,11,14,10,13,300,515",
            "01/09/2009,13,15,12,14,250,520",
            "01/12/2009,14,16,13,15,400,525",
        ],
    );
    let output = dir.path().join("weekly.csv");

    let summary = run_weekly(&input, &output).unwrap();
    assert_eq!(summary.daily_bars, 6);
    assert_eq!(summary.weekly_bars, 2);

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.split("\r\n").collect();
    assert_eq!(
        lines[0],
        "\"Date\",\"Open\",\"High\",\"Low\",\"Close\",\"Volume\",\"OpenInt\""
    );
    assert_eq!(lines[1], "01/05/2009,10,15,8,14,1000,520");
    assert_eq!(lines[2], "01/12/2009,14,16,13,15,400,525");
}

#[test]
fn weekly_empty_input_writes_only_header() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "daily.csv",
        &["\"Date\",\"Open\",\"High\",\"Low\",\"Close\",\"Volume\",\"OpenInt\""],
    );
    let output = dir.path().join("weekly.csv");

    let summary = run_weekly(&input, &output).unwrap();
    assert_eq!(summary.weekly_bars, 0);

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "\"Date\",\"Open\",\"High\",\"Low\",\"Close\",\"Volume\",\"OpenInt\"\r\n"
    );
}

#[test]
fn weekly_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("does_not_exist.csv");
    let output = dir.path().join("weekly.csv");

    let result = run_weekly(&input, &output);
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn weekly_malformed_row_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "daily.csv",
        &[
            "Date,Open,High,Low,Close,Volume,OpenInt",
            "01/05/2009,10,12,9,11,100,500",
            "01/06/2009,12,13,10",
        ],
    );
    let output = dir.path().join("weekly.csv");

    let err = run_weekly(&input, &output).unwrap_err();
    assert!(format!("{:#}", err).contains("line 3"));
    assert!(!output.exists());
}

#[test]
fn weekly_output_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "daily.csv",
        &[
            "Date,Open,High,Low,Close,Volume,OpenInt",
            "01/05/2009,10,12,9,11,100,500",
        ],
    );
    let output = dir.path().join("weekly.csv");
    fs::write(&output, "stale content that should disappear").unwrap();

    run_weekly(&input, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(!content.contains("stale"));
    assert!(content.starts_with("\"Date\""));
}

fn tiny_ephemeris_config() -> EphemerisConfig {
    let mut geocentric = HashMap::new();
    geocentric.insert("Moon".to_string(), 1);
    geocentric.insert("Sun".to_string(), 2);
    let mut heliocentric = HashMap::new();
    heliocentric.insert("Mercury".to_string(), 3);

    EphemerisConfig {
        geocentric_columns: geocentric,
        heliocentric_columns: heliocentric,
        singles: vec![
            SingleColumn {
                frame: Frame::Geocentric,
                body: "Moon".to_string(),
            },
            SingleColumn {
                frame: Frame::Heliocentric,
                body: "Mercury".to_string(),
            },
        ],
        pairs: vec![PairColumn {
            frame: Frame::Geocentric,
            faster: "Moon".to_string(),
            slower: "Sun".to_string(),
        }],
    }
}

#[test]
fn ephemeris_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "ephemeris.csv",
        &[
            "Date,MoonLon,SunLon,MercuryHelioLon",
            "01/05/2009,350,284,100",
            "01/06/2009,355,285,104",
            "01/07/2009,2,286,108",
            "01/08/2009,8,287,112",
        ],
    );
    let output = dir.path().join("master.csv");

    let summary = run_ephemeris(&input, &output, &tiny_ephemeris_config()).unwrap();
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.derived_columns, 3);

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "Date,MoonLon,SunLon,MercuryHelioLon,G.Moon,H.Mercury,G.Moon/G.Sun"
    );
    // Original cells untouched, derived cells appended.
    assert_eq!(lines[1], "01/05/2009,350,284,100,350,100,426");
    assert_eq!(lines[3], "01/07/2009,2,286,108,362,108,436");
    assert_eq!(lines[4], "01/08/2009,8,287,112,368,112,441");
    // Newline-terminated, not CRLF.
    assert!(!content.contains('\r'));
    assert!(content.ends_with('\n'));
}

#[test]
fn ephemeris_non_numeric_cell_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "ephemeris.csv",
        &[
            "Date,MoonLon,SunLon,MercuryHelioLon",
            "01/05/2009,350,284,100",
            "01/06/2009,,285,104",
        ],
    );
    let output = dir.path().join("master.csv");

    let err = run_ephemeris(&input, &output, &tiny_ephemeris_config()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("line 3"));
    assert!(!output.exists());
}

#[test]
fn ephemeris_default_config_against_wide_table() {
    // A synthetic 70-column table with plausible motion in every configured
    // longitude column; the default configuration must append its full
    // 132-column set.
    let config = EphemerisConfig::default();

    let mut lines: Vec<String> = Vec::new();
    let header: Vec<String> = (0..70).map(|i| format!("c{}", i)).collect();
    lines.push(header.join(","));
    for day in 0..10 {
        let row: Vec<String> = (0..70)
            .map(|col| format!("{:.4}", ((col * 37 + day * 11) % 360) as f64))
            .collect();
        lines.push(row.join(","));
    }

    let dir = TempDir::new().unwrap();
    let line_refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    let input = write_file(&dir, "wide.csv", &line_refs);
    let output = dir.path().join("master.csv");

    let summary = run_ephemeris(&input, &output, &config).unwrap();
    assert_eq!(summary.rows, 10);
    assert_eq!(summary.derived_columns, 132);

    let content = fs::read_to_string(&output).unwrap();
    let out_header: Vec<&str> = content.lines().next().unwrap().split(',').collect();
    assert_eq!(out_header.len(), 70 + 132);
    assert_eq!(out_header[70], "G.Moon");
    assert_eq!(out_header[70 + 131], "H.Neptune/H.Pluto");
}
