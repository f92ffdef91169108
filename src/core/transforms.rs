//! Longitude continuity transforms.
//!
//! Daily planetary longitude is a sawtooth signal: it resets at the 0/360
//! boundary. Downstream cycle analysis needs a continuous signal, so each
//! wrap is unrolled relative to the accumulated prior trend by adding or
//! subtracting full periods. The same adjustment drives the two-body synodic
//! combination.

/// Full period of a longitude value, in degrees.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Maximum day-to-day increment a series may exhibit, in degrees.
///
/// A raw step larger than this is treated as a wrap and corrected by whole
/// periods.
pub const MAX_DAILY_INCREMENT_DEG: f64 = 330.0;

/// Single-scalar state for the continuity adjustment: the previous output
/// value, `None` at the start of each independent series.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuityState {
    prev: Option<f64>,
}

impl ContinuityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjusts a raw value against the previous output value.
    ///
    /// Whole periods are added or subtracted until the step from the previous
    /// output stays within [`MAX_DAILY_INCREMENT_DEG`]. These are loops rather
    /// than single conditionals: a gap can in principle exceed one full period
    /// between adjacent rows, even though smooth astronomical motion never
    /// needs more than one iteration.
    pub fn adjust(&mut self, raw: f64) -> f64 {
        let mut value = raw;
        if let Some(prev) = self.prev {
            while prev < value - MAX_DAILY_INCREMENT_DEG {
                value -= FULL_CIRCLE_DEG;
            }
            while prev >= value + MAX_DAILY_INCREMENT_DEG {
                value += FULL_CIRCLE_DEG;
            }
        }
        self.prev = Some(value);
        value
    }
}

/// Unwrap a single-body longitude series into a continuous series.
///
/// Input values lie in [0, 360); output values may not. The output has the
/// same length, every output value is congruent to its input modulo 360, and
/// adjacent output values differ by strictly less than
/// [`MAX_DAILY_INCREMENT_DEG`] in magnitude.
pub fn unwrap_series(values: &[f64]) -> Vec<f64> {
    let mut state = ContinuityState::new();
    values.iter().map(|&v| state.adjust(v)).collect()
}

/// Combine two raw longitude series with the synodic formula.
///
/// For each row the raw combined value is
/// `faster + 360 - slower`, then the same continuity adjustment as
/// [`unwrap_series`] is applied against the previous combined output. The
/// faster/slower labelling is caller convention; it is not checked against
/// actual orbital speed.
pub fn combine_series(faster: &[f64], slower: &[f64]) -> Vec<f64> {
    debug_assert_eq!(
        faster.len(),
        slower.len(),
        "faster and slower series must have same length"
    );

    let mut state = ContinuityState::new();
    faster
        .iter()
        .zip(slower.iter())
        .map(|(&f, &s)| state.adjust(f + FULL_CIRCLE_DEG - s))
        .collect()
}
