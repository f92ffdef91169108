//! Command-line interface for the cycle pipelines.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

use crate::processors::{ephemeris, weekly};
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "cycle-pipeline")]
#[command(about = "Batch CSV pipelines for market-cycle research data", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold a daily OHLCV price-bar CSV into weekly bars
    Weekly {
        /// Input daily pricebar CSV file, ordered oldest to newest
        #[arg(long)]
        input_file: PathBuf,
        /// Output CSV file that will have weekly pricebars
        #[arg(long)]
        output_file: PathBuf,
    },

    /// Append unwrapped and combined longitude columns to an ephemeris CSV
    Ephemeris {
        /// Input generic daily ephemeris CSV file
        input_path: PathBuf,
        /// Output master ephemeris CSV file
        output_path: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.len() > 39 {
            format!("{}...", &value[..36])
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Report a fatal error on stdout and terminate with a failure status.
fn fail(message: impl std::fmt::Display) -> ! {
    println!("Error: {}", message);
    std::process::exit(1);
}

pub fn run() {
    // A missing required argument is a usage error: report it the same way
    // as any other validation failure. Help and version output stay on the
    // success path.
    let cli = Cli::try_parse().unwrap_or_else(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{}", e);
            std::process::exit(0);
        }
        _ => fail(e),
    });

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => fail(format!(
                "failed to load config from {}: {}",
                path.display(),
                e
            )),
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Weekly {
            input_file,
            output_file,
        } => {
            cmd_weekly(&input_file, &output_file);
        }
        Commands::Ephemeris {
            input_path,
            output_path,
        } => {
            cmd_ephemeris(&input_path, &output_path, &config);
        }
    }
}

fn cmd_weekly(input_file: &PathBuf, output_file: &PathBuf) {
    let start = Instant::now();

    let spinner = create_spinner("Aggregating daily bars into weeks...");

    match weekly::run_weekly(input_file, output_file) {
        Ok(summary) => {
            spinner.finish_and_clear();

            print_summary(
                "Weekly Aggregation Complete",
                &[
                    ("Input file", input_file.display().to_string()),
                    ("Output file", output_file.display().to_string()),
                    ("Daily bars", summary.daily_bars.to_string()),
                    ("Weekly bars", summary.weekly_bars.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            fail(format!("{:#}", e));
        }
    }
}

fn cmd_ephemeris(input_path: &PathBuf, output_path: &PathBuf, config: &PipelineConfig) {
    let start = Instant::now();

    println!("Doing planet calculations...");
    println!("Input: {}", input_path.display());
    println!("Output: {}", output_path.display());
    println!(
        "Derived columns: {}",
        config.ephemeris.num_derived_columns()
    );

    let spinner = create_spinner("Computing derived longitude columns...");

    match ephemeris::run_ephemeris(input_path, output_path, &config.ephemeris) {
        Ok(summary) => {
            spinner.finish_and_clear();

            print_summary(
                "Ephemeris Extension Complete",
                &[
                    ("Input file", input_path.display().to_string()),
                    ("Output file", output_path.display().to_string()),
                    ("Rows", summary.rows.to_string()),
                    ("Derived columns", summary.derived_columns.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            spinner.finish_and_clear();
            fail(format!("{:#}", e));
        }
    }
}
