//! Stochastic oscillator (%K / %D).
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over `k_period`
//! bars, 50 when the range is zero. %D is the simple mean of the last
//! `d_period` %K values. Initialized once %D has a full window.

use std::collections::VecDeque;

use super::{check_period, Indicator, IndicatorError, Sma};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    name: String,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    k: Option<f64>,
    d: Sma,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Result<Self, IndicatorError> {
        let k_period = check_period("stochastic_k", k_period)?;
        let d_period = check_period("stochastic_d", d_period)?;
        Ok(Self {
            k_period,
            d_period,
            name: format!("stoch_{k_period}_{d_period}"),
            highs: VecDeque::with_capacity(k_period + 1),
            lows: VecDeque::with_capacity(k_period + 1),
            k: None,
            d: Sma::new(d_period)?,
        })
    }

    pub fn d_period(&self) -> usize {
        self.d_period
    }

    /// Latest %K (0 until initialized).
    pub fn value_k(&self) -> f64 {
        if self.initialized() {
            self.k.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Latest %D (0 until initialized).
    pub fn value_d(&self) -> f64 {
        self.d.value().unwrap_or(0.0)
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_bar(&mut self, bar: &Bar) {
        self.highs.push_back(bar.high);
        self.lows.push_back(bar.low);
        if self.highs.len() > self.k_period {
            self.highs.pop_front();
            self.lows.pop_front();
        }
        if self.highs.len() < self.k_period {
            return;
        }

        let highest = self.highs.iter().copied().fold(f64::MIN, f64::max);
        let lowest = self.lows.iter().copied().fold(f64::MAX, f64::min);
        let range = highest - lowest;
        let k = if range > 0.0 {
            (100.0 * (bar.close - lowest) / range).clamp(0.0, 100.0)
        } else {
            50.0
        };
        self.k = Some(k);
        self.d.update(k);
    }

    fn initialized(&self) -> bool {
        self.d.initialized()
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.k = None;
        self.d.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_hlc_bars, DEFAULT_EPSILON};

    #[test]
    fn k_and_d_basic() {
        let bars = make_hlc_bars(&[
            (10.0, 8.0, 9.0),
            (12.0, 9.0, 11.0),  // window [8, 12] → K 75
            (11.0, 9.0, 9.0),   // window [9, 12] → K 0
            (13.0, 10.0, 13.0), // window [9, 13] → K 100
        ]);
        let mut stoch = Stochastic::new(2, 2).unwrap();
        stoch.handle_bar(&bars[0]);
        stoch.handle_bar(&bars[1]);
        assert!(!stoch.initialized());
        stoch.handle_bar(&bars[2]);
        assert!(stoch.initialized());
        assert_approx(stoch.value_k(), 0.0, DEFAULT_EPSILON);
        assert_approx(stoch.value_d(), 37.5, DEFAULT_EPSILON);
        stoch.handle_bar(&bars[3]);
        assert_approx(stoch.value_k(), 100.0, DEFAULT_EPSILON);
        assert_approx(stoch.value_d(), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_range_is_midpoint() {
        let bars = make_hlc_bars(&[(1.0, 1.0, 1.0); 4]);
        let mut stoch = Stochastic::new(3, 1).unwrap();
        for bar in &bars {
            stoch.handle_bar(bar);
        }
        assert_eq!(stoch.value_k(), 50.0);
    }

    #[test]
    fn zero_periods_fail() {
        assert!(Stochastic::new(0, 3).is_err());
        assert!(Stochastic::new(14, 0).is_err());
    }

    #[test]
    fn reset_clears_state() {
        let bars = make_hlc_bars(&[(2.0, 1.0, 1.5); 5]);
        let mut stoch = Stochastic::new(2, 2).unwrap();
        for bar in &bars {
            stoch.handle_bar(bar);
        }
        assert!(stoch.initialized());
        stoch.reset();
        assert!(!stoch.initialized());
        assert_eq!(stoch.value_k(), 0.0);
    }
}
