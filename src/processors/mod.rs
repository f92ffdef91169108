//! High-level pipeline drivers.

pub mod ephemeris;
pub mod weekly;

pub use ephemeris::run_ephemeris;
pub use weekly::run_weekly;
