//! Batch CSV pipelines for market-cycle research data.
//!
//! This crate provides two independent transforms:
//! - Folding daily OHLCV price-bar CSV files into weekly bars
//! - Appending unwrapped (continuous) and combined (synodic) planetary
//!   longitude columns to a wide daily ephemeris CSV
//!
//! # Example
//!
//! ```no_run
//! use cycle_pipeline::core::transforms::unwrap_series;
//!
//! let raw = vec![350.0, 355.0, 2.0, 8.0];
//! let continuous = unwrap_series(&raw);
//! assert_eq!(continuous, vec![350.0, 355.0, 362.0, 368.0]);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{EphemerisConfig, Frame, PipelineConfig};
pub use core::loaders::{EphemerisTable, PriceBar};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
