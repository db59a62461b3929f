//! Moving average crossover detection: single-bar edge detector.
//!
//! Bullish when the fast MA crosses above the slow MA:
//!   fast > slow and prev_fast <= prev_slow
//! Bearish when the fast MA crosses below the slow MA:
//!   fast < slow and prev_fast >= prev_slow
//!
//! Only the previous pair of values is remembered.

use super::SignalDirection;

/// Outcome of one detector step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crossover {
    pub bullish: bool,
    pub bearish: bool,
}

impl Crossover {
    pub fn direction(self) -> Option<SignalDirection> {
        if self.bullish {
            Some(SignalDirection::Buy)
        } else if self.bearish {
            Some(SignalDirection::Sell)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrossoverDetector {
    prev: Option<(f64, f64)>,
}

impl CrossoverDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the transition from the stored previous values to `(fast, slow)`
    /// without storing them.
    ///
    /// Returns no crossover when either current value is missing (MA still
    /// warming up) or no previous pair has been stored yet.
    pub fn detect(&self, fast: Option<f64>, slow: Option<f64>) -> Crossover {
        let (Some(fast), Some(slow), Some((prev_fast, prev_slow))) = (fast, slow, self.prev) else {
            return Crossover::default();
        };
        if [fast, slow, prev_fast, prev_slow].iter().any(|v| v.is_nan()) {
            return Crossover::default();
        }
        Crossover {
            bullish: fast > slow && prev_fast <= prev_slow,
            bearish: fast < slow && prev_fast >= prev_slow,
        }
    }

    /// Store the current values as "previous" for the next bar.
    ///
    /// A missing value clears the memory so that the next bar cannot report a
    /// crossover against stale data.
    pub fn store(&mut self, fast: Option<f64>, slow: Option<f64>) {
        self.prev = fast.zip(slow);
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}
