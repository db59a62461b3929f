//! Tracks how many Stochastic bars have elapsed since the last %K/%D cross.
//!
//! Runs on the Stochastic bar stream (usually coarser than the primary
//! timeframe). Bullish crosses (%K moving above %D) and bearish crosses are
//! tracked separately; `None` means no cross of that kind has been seen yet.

use crate::indicators::{Indicator, Stochastic};

#[derive(Debug, Clone, Default)]
pub struct StochasticCrossTracker {
    prev: Option<(f64, f64)>,
    bars_since_bullish: Option<usize>,
    bars_since_bearish: Option<usize>,
}

impl StochasticCrossTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per Stochastic bar, after the indicator has consumed it.
    pub fn update_from(&mut self, stoch: &Stochastic) {
        if stoch.initialized() {
            self.update(stoch.value_k(), stoch.value_d());
        }
    }

    pub fn update(&mut self, k: f64, d: f64) {
        if let Some(n) = self.bars_since_bullish.as_mut() {
            *n += 1;
        }
        if let Some(n) = self.bars_since_bearish.as_mut() {
            *n += 1;
        }
        if let Some((prev_k, prev_d)) = self.prev {
            if k > d && prev_k <= prev_d {
                self.bars_since_bullish = Some(0);
            } else if k < d && prev_k >= prev_d {
                self.bars_since_bearish = Some(0);
            }
        }
        self.prev = Some((k, d));
    }

    pub fn bars_since_bullish(&self) -> Option<usize> {
        self.bars_since_bullish
    }

    pub fn bars_since_bearish(&self) -> Option<usize> {
        self.bars_since_bearish
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cross_before_two_readings() {
        let mut t = StochasticCrossTracker::new();
        t.update(60.0, 50.0);
        assert_eq!(t.bars_since_bullish(), None);
        assert_eq!(t.bars_since_bearish(), None);
    }

    #[test]
    fn bullish_cross_then_ages() {
        let mut t = StochasticCrossTracker::new();
        t.update(40.0, 50.0);
        t.update(55.0, 50.0);
        assert_eq!(t.bars_since_bullish(), Some(0));
        t.update(60.0, 52.0);
        t.update(65.0, 55.0);
        assert_eq!(t.bars_since_bullish(), Some(2));
        assert_eq!(t.bars_since_bearish(), None);
    }

    #[test]
    fn bearish_cross_tracked_separately() {
        let mut t = StochasticCrossTracker::new();
        t.update(40.0, 50.0);
        t.update(55.0, 50.0); // bullish
        t.update(45.0, 50.0); // bearish
        assert_eq!(t.bars_since_bullish(), Some(1));
        assert_eq!(t.bars_since_bearish(), Some(0));
        t.reset();
        assert_eq!(t.bars_since_bullish(), None);
    }
}
