//! ADX: Average Directional Index, derived from a `Dmi`.
//!
//! DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when both are 0.
//! ADX = mean of the first `period` DX values, then Wilder-smoothed:
//! adx = (adx * (period - 1) + dx) / period.
//!
//! `Adx` does not see bars; the strategy feeds it the DMI readings after
//! every DMI update once the DMI is initialized.

use super::{check_period, Dmi, Indicator, IndicatorError};

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    count: usize,
    seed_sum: f64,
    value: f64,
}

impl Adx {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = check_period("adx", period)?;
        Ok(Self { period, count: 0, seed_sum: 0.0, value: 0.0 })
    }

    /// Directional index for one pair of DI readings.
    pub fn dx(plus_di: f64, minus_di: f64) -> f64 {
        let sum = plus_di + minus_di;
        if sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / sum
        }
    }

    /// Consume the latest DMI state. Ignored until the DMI is initialized.
    pub fn update_from(&mut self, dmi: &Dmi) {
        if dmi.initialized() {
            self.update(dmi.plus_di(), dmi.minus_di());
        }
    }

    pub fn update(&mut self, plus_di: f64, minus_di: f64) {
        let dx = Self::dx(plus_di, minus_di);
        if self.count < self.period {
            self.seed_sum += dx;
            self.count += 1;
            if self.count == self.period {
                self.value = self.seed_sum / self.period as f64;
            }
            return;
        }
        let p = self.period as f64;
        self.value = (self.value * (p - 1.0) + dx) / p;
        self.count += 1;
    }

    pub fn initialized(&self) -> bool {
        self.count >= self.period
    }

    /// Current ADX, or `None` during warm-up.
    pub fn value(&self) -> Option<f64> {
        self.initialized().then_some(self.value)
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.seed_sum = 0.0;
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, Indicator, DEFAULT_EPSILON};

    #[test]
    fn dx_handles_zero_sum() {
        assert_eq!(Adx::dx(0.0, 0.0), 0.0);
        assert_approx(Adx::dx(30.0, 10.0), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn seed_then_wilder() {
        let mut adx = Adx::new(2).unwrap();
        adx.update(30.0, 10.0); // dx 50
        assert!(!adx.initialized());
        adx.update(20.0, 20.0); // dx 0
        assert_approx(adx.value().unwrap(), 25.0, DEFAULT_EPSILON);
        adx.update(40.0, 0.0); // dx 100
        assert_approx(adx.value().unwrap(), 62.5, DEFAULT_EPSILON);
    }

    #[test]
    fn strong_trend_has_elevated_adx() {
        let closes: Vec<f64> = (0..40).map(|i| 1.0 + i as f64 * 0.01).collect();
        let mut dmi = Dmi::new(5).unwrap();
        let mut adx = Adx::new(5).unwrap();
        for bar in make_bars(&closes) {
            dmi.handle_bar(&bar);
            adx.update_from(&dmi);
        }
        let value = adx.value().unwrap();
        assert!(value > 20.0, "ADX should be elevated in a steady trend, got {value}");
        assert!(value <= 100.0);
    }

    #[test]
    fn ignores_uninitialized_dmi() {
        let dmi = Dmi::new(14).unwrap();
        let mut adx = Adx::new(3).unwrap();
        adx.update_from(&dmi);
        assert!(!adx.initialized());
        adx.update(10.0, 5.0);
        adx.reset();
        assert_eq!(adx.value(), None);
    }
}
