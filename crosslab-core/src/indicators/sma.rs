//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a fixed window.
//! Initialized once `period` closes have been seen.
//!
//! The mean is taken over deviations from the oldest value in the window, so
//! a flat window yields exactly its price and two flat windows of different
//! lengths compare equal.

use std::collections::VecDeque;

use super::{check_period, Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    window: VecDeque<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = check_period("sma", period)?;
        Ok(Self {
            period,
            name: format!("sma_{period}"),
            window: VecDeque::with_capacity(period + 1),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed a raw value (used directly for %D smoothing).
    pub fn update(&mut self, value: f64) {
        self.window.push_back(value);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
    }

    /// Current mean, or `None` during warm-up.
    pub fn value(&self) -> Option<f64> {
        if !self.initialized() {
            return None;
        }
        let anchor = *self.window.front()?;
        let deviation: f64 = self.window.iter().map(|v| v - anchor).sum();
        Some(anchor + deviation / self.period as f64)
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_bar(&mut self, bar: &Bar) {
        self.update(bar.close);
    }

    fn initialized(&self) -> bool {
        self.window.len() >= self.period
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}
