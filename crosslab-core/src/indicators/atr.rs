//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period), seeded with the mean
//! of the first `period` true ranges. The first bar has no previous close and
//! only seeds `prev_close`.

use super::{check_period, true_range, Indicator, IndicatorError};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
    prev_close: Option<f64>,
    seed_sum: f64,
    count: usize,
    value: f64,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = check_period("atr", period)?;
        Ok(Self {
            period,
            name: format!("atr_{period}"),
            prev_close: None,
            seed_sum: 0.0,
            count: 0,
            value: 0.0,
        })
    }

    /// Current ATR, or `None` during warm-up.
    pub fn value(&self) -> Option<f64> {
        self.initialized().then_some(self.value)
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle_bar(&mut self, bar: &Bar) {
        let Some(prev_close) = self.prev_close.replace(bar.close) else {
            return;
        };
        let tr = true_range(bar.high, bar.low, prev_close);

        if self.count < self.period {
            self.seed_sum += tr;
            self.count += 1;
            if self.count == self.period {
                self.value = self.seed_sum / self.period as f64;
            }
            return;
        }

        let alpha = 1.0 / self.period as f64;
        self.value = alpha * tr + (1.0 - alpha) * self.value;
        self.count += 1;
    }

    fn initialized(&self) -> bool {
        self.count >= self.period
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.seed_sum = 0.0;
        self.count = 0;
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_hlc_bars, DEFAULT_EPSILON};

    fn sample_bars() -> Vec<Bar> {
        make_hlc_bars(&[
            (105.0, 95.0, 102.0),  // seeds prev close
            (108.0, 100.0, 106.0), // TR = 8
            (107.0, 98.0, 99.0),   // TR = 9
            (103.0, 97.0, 101.0),  // TR = 6
            (106.0, 100.0, 105.0), // TR = 6
        ])
    }

    #[test]
    fn atr_period_3() {
        let mut atr = Atr::new(3).unwrap();
        let mut out = Vec::new();
        for bar in &sample_bars() {
            atr.handle_bar(bar);
            out.push(atr.value());
        }
        assert!(out[..3].iter().all(Option::is_none));
        // Seed: mean(8, 9, 6) = 23/3
        assert_approx(out[3].unwrap(), 23.0 / 3.0, DEFAULT_EPSILON);
        // (1/3)*6 + (2/3)*(23/3) = 64/9
        assert_approx(out[4].unwrap(), 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_reset_restarts_warmup() {
        let mut atr = Atr::new(2).unwrap();
        for bar in &sample_bars() {
            atr.handle_bar(bar);
        }
        assert!(atr.initialized());
        atr.reset();
        assert!(!atr.initialized());
        assert_eq!(atr.value(), None);
    }

    #[test]
    fn atr_zero_period_fails() {
        assert!(Atr::new(0).is_err());
    }
}
