//! Streaming indicator implementations.
//!
//! Indicators are updated one bar at a time by the strategy and hold only the
//! state needed for the next update. Each reports `initialized()` once its
//! warm-up window is full; values read before that are not meaningful and the
//! filters that consume them accept by default.

pub mod adx;
pub mod atr;
pub mod dmi;
pub mod sma;
pub mod stochastic;

pub use adx::Adx;
pub use atr::Atr;
pub use dmi::Dmi;
pub use sma::Sma;
pub use stochastic::Stochastic;

use crate::domain::Bar;
use thiserror::Error;

/// Errors raised when constructing an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("{indicator} period must be >= 1, got {period}")]
    InvalidPeriod { indicator: &'static str, period: usize },
}

pub(crate) fn check_period(indicator: &'static str, period: usize) -> Result<usize, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod { indicator, period });
    }
    Ok(period)
}

/// Trait for streaming indicators.
///
/// # Look-ahead contamination guard
/// `handle_bar` only sees the bar being processed; no indicator can observe
/// a future bar.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "dmi_14").
    fn name(&self) -> &str;

    /// Feed the next bar.
    fn handle_bar(&mut self, bar: &Bar);

    /// True once enough bars have been consumed for the output to be meaningful.
    fn initialized(&self) -> bool;

    /// Return to the pre-first-bar state.
    fn reset(&mut self);
}

/// True range of `bar` given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low).max((high - prev_close).abs()).max((low - prev_close).abs())
}

/// Create synthetic 1-minute bars from close prices for testing.
///
/// open = prev_close (or close for first bar),
/// high = max(open,close) + 0.0005, low = min(open,close) - 0.0005.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use crate::domain::BarType;
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let ts = base + Duration::minutes(i as i64);
            Bar {
                bar_type: BarType::new("TEST.SIM", "1-MINUTE-MID-EXTERNAL"),
                open,
                high: open.max(close) + 0.0005,
                low: open.min(close) - 0.0005,
                close,
                volume: 1000.0,
                ts_event: ts,
                ts_init: ts,
            }
        })
        .collect()
}

/// Create bars from explicit (high, low, close) triples for testing.
#[cfg(test)]
pub fn make_hlc_bars(data: &[(f64, f64, f64)]) -> Vec<Bar> {
    let closes: Vec<f64> = data.iter().map(|&(_, _, c)| c).collect();
    let mut bars = make_bars(&closes);
    for (bar, &(high, low, close)) in bars.iter_mut().zip(data) {
        bar.high = high;
        bar.low = low;
        bar.open = close;
    }
    bars
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_range_uses_gap_from_prev_close() {
        assert_approx(true_range(105.0, 95.0, 100.0), 10.0, DEFAULT_EPSILON);
        assert_approx(true_range(115.0, 108.0, 100.0), 15.0, DEFAULT_EPSILON);
        assert_approx(true_range(101.0, 92.0, 110.0), 18.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = check_period("sma", 0).unwrap_err();
        assert_eq!(err, IndicatorError::InvalidPeriod { indicator: "sma", period: 0 });
        assert_eq!(check_period("sma", 3), Ok(3));
    }
}
