//! DMI: Directional Movement Index (+DI / -DI), Wilder smoothing.
//!
//! Steps per bar (after the first):
//! 1. up = high - prev_high, down = prev_low - low
//! 2. +DM = up if up > down and up > 0, else 0; -DM mirrored
//! 3. TR = max(high-low, |high-prev_close|, |low-prev_close|)
//! 4. The first `period` values are summed and seed the smoothed accumulators;
//!    afterwards smoothed = smoothed - smoothed/period + raw
//! 5. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI likewise, 0 when TR is 0
//!
//! The first bar only records previous high/low/close, so the indicator is
//! initialized after `period + 1` bars.

use super::{check_period, true_range, Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy)]
struct PrevBar {
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Debug, Clone)]
pub struct Dmi {
    period: usize,
    name: String,
    prev: Option<PrevBar>,
    count: usize,
    sum_plus_dm: f64,
    sum_minus_dm: f64,
    sum_tr: f64,
    smoothed_plus_dm: f64,
    smoothed_minus_dm: f64,
    smoothed_tr: f64,
}

impl Dmi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = check_period("dmi", period)?;
        Ok(Self {
            period,
            name: format!("dmi_{period}"),
            prev: None,
            count: 0,
            sum_plus_dm: 0.0,
            sum_minus_dm: 0.0,
            sum_tr: 0.0,
            smoothed_plus_dm: 0.0,
            smoothed_minus_dm: 0.0,
            smoothed_tr: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of directional-movement values consumed (bars after the first).
    pub fn count(&self) -> usize {
        self.count
    }

    /// +DI in [0, 100]; 0 until initialized.
    pub fn plus_di(&self) -> f64 {
        self.di(self.smoothed_plus_dm)
    }

    /// -DI in [0, 100]; 0 until initialized.
    pub fn minus_di(&self) -> f64 {
        self.di(self.smoothed_minus_dm)
    }

    pub fn is_bullish(&self) -> bool {
        self.initialized() && self.plus_di() > self.minus_di()
    }

    pub fn is_bearish(&self) -> bool {
        self.initialized() && self.minus_di() > self.plus_di()
    }

    fn di(&self, smoothed_dm: f64) -> f64 {
        if !self.initialized() || self.smoothed_tr == 0.0 {
            return 0.0;
        }
        (100.0 * smoothed_dm / self.smoothed_tr).clamp(0.0, 100.0)
    }
}

impl Indicator for Dmi {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_bar(&mut self, bar: &Bar) {
        let current = PrevBar { high: bar.high, low: bar.low, close: bar.close };
        let Some(prev) = self.prev.replace(current) else {
            return;
        };

        let up = bar.high - prev.high;
        let down = prev.low - bar.low;
        let plus_dm = if up > down && up > 0.0 { up } else { 0.0 };
        let minus_dm = if down > up && down > 0.0 { down } else { 0.0 };
        let tr = true_range(bar.high, bar.low, prev.close);

        if self.count < self.period {
            self.sum_plus_dm += plus_dm;
            self.sum_minus_dm += minus_dm;
            self.sum_tr += tr;
            self.count += 1;
            if self.count == self.period {
                self.smoothed_plus_dm = self.sum_plus_dm;
                self.smoothed_minus_dm = self.sum_minus_dm;
                self.smoothed_tr = self.sum_tr;
            }
            return;
        }

        let p = self.period as f64;
        self.smoothed_plus_dm = self.smoothed_plus_dm - self.smoothed_plus_dm / p + plus_dm;
        self.smoothed_minus_dm = self.smoothed_minus_dm - self.smoothed_minus_dm / p + minus_dm;
        self.smoothed_tr = self.smoothed_tr - self.smoothed_tr / p + tr;
        self.count += 1;
    }

    fn initialized(&self) -> bool {
        self.count >= self.period
    }

    fn reset(&mut self) {
        self.prev = None;
        self.count = 0;
        self.sum_plus_dm = 0.0;
        self.sum_minus_dm = 0.0;
        self.sum_tr = 0.0;
        self.smoothed_plus_dm = 0.0;
        self.smoothed_minus_dm = 0.0;
        self.smoothed_tr = 0.0;
    }
}
