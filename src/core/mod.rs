//! Core data loading, transformation, and writing functionality.

pub mod loaders;
pub mod transforms;
pub mod writers;

pub use loaders::{EphemerisTable, PriceBar, WeeklyBar};
