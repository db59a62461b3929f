//! Signal filters: gate crossover signals based on market conditions.
//!
//! Filters evaluate a candidate direction against a snapshot of indicator and
//! breaker state and produce a `FilterEvaluation`. The `FilterBank` runs them
//! in a fixed cascade; the first rejection short-circuits the rest.
//!
//! # Architecture invariant
//! Filters must not reference position state. Position limits are enforced by
//! the order lifecycle after the cascade passes.

pub mod adx_filter;
pub mod cooldown;
pub mod dmi_filter;
pub mod session;
pub mod stochastic;
pub mod threshold;
pub mod volatility;

pub use adx_filter::AdxFilter;
pub use cooldown::CircuitBreakerFilter;
pub use dmi_filter::DmiTrendFilter;
pub use session::{TimeOfDayFilter, TradingWindow};
pub use stochastic::StochasticFilter;
pub use threshold::CrossoverThresholdFilter;
pub use volatility::AtrFilter;

use crate::clock::clock_for;
use crate::domain::Bar;
use crate::indicators::{Adx, Atr, Dmi, Stochastic};
use crate::orders::CircuitBreaker;
use crate::signals::{SignalDirection, StochasticCrossTracker};
use crate::strategy::StrategyConfig;
use std::collections::HashMap;
use tracing::debug;

/// Everything a filter may look at for one candidate signal.
///
/// Optional indicators are `None` when their feature is disabled.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub bar: &'a Bar,
    pub fast_ma: f64,
    pub slow_ma: f64,
    pub pip_value: f64,
    pub atr: Option<&'a Atr>,
    pub dmi: Option<&'a Dmi>,
    pub adx: Option<&'a Adx>,
    pub stochastic: Option<&'a Stochastic>,
    pub stoch_crosses: &'a StochasticCrossTracker,
    pub circuit_breaker: &'a CircuitBreaker,
}

/// Outcome of a single filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
    Passed,
    Rejected { reason: String },
}

impl FilterVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}

/// Record of a filter evaluating a candidate signal.
#[derive(Debug, Clone)]
pub struct FilterEvaluation {
    pub filter_name: String,
    pub verdict: FilterVerdict,
    /// The primary value the filter measured (e.g. ADX, crossover distance in pips).
    pub measured: Option<f64>,
    /// Snapshot of the filter's inputs at evaluation time.
    pub filter_state: HashMap<String, f64>,
}

impl FilterEvaluation {
    pub fn passed(filter_name: &str) -> Self {
        Self {
            filter_name: filter_name.to_string(),
            verdict: FilterVerdict::Passed,
            measured: None,
            filter_state: HashMap::new(),
        }
    }

    pub fn rejected(filter_name: &str, reason: String) -> Self {
        Self {
            filter_name: filter_name.to_string(),
            verdict: FilterVerdict::Rejected { reason },
            measured: None,
            filter_state: HashMap::new(),
        }
    }

    pub fn with_measured(mut self, value: f64) -> Self {
        self.measured = Some(value);
        self
    }

    pub fn with_state(mut self, key: &str, value: f64) -> Self {
        self.filter_state.insert(key.to_string(), value);
        self
    }
}

/// Trait for signal filters.
///
/// A disabled filter always passes.
pub trait SignalFilter: Send + Sync + std::fmt::Debug {
    /// Human-readable name (e.g., "adx_filter").
    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    /// Evaluate whether a candidate signal should be allowed through.
    fn evaluate(&self, direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation;
}

/// Ordered cascade of filters.
#[derive(Debug)]
pub struct FilterBank {
    filters: Vec<Box<dyn SignalFilter>>,
}

impl FilterBank {
    pub fn new(filters: Vec<Box<dyn SignalFilter>>) -> Self {
        Self { filters }
    }

    /// Build the standard cascade: circuit breaker, crossover threshold, ATR,
    /// time of day, ADX, DMI, Stochastic.
    pub fn from_config(config: &StrategyConfig) -> Self {
        let window = TradingWindow::new(config.trading_hours_start, config.trading_hours_end);
        let filters: Vec<Box<dyn SignalFilter>> = vec![
            Box::new(CircuitBreakerFilter::new(config.circuit_breaker_enabled)),
            Box::new(CrossoverThresholdFilter::new(config.crossover_threshold_pips)),
            Box::new(AtrFilter::new(
                config.atr_enabled,
                config.atr_min_strength,
                config.atr_max_strength,
            )),
            Box::new(TimeOfDayFilter::new(
                config.time_filter_enabled,
                window,
                &config.excluded_hours,
                clock_for(&config.trading_hours_timezone),
            )),
            Box::new(AdxFilter::new(config.adx_enabled, config.adx_min_threshold)),
            Box::new(DmiTrendFilter::new(config.dmi_enabled)),
            Box::new(StochasticFilter::new(
                config.stoch_enabled,
                config.stoch_bullish_threshold,
                config.stoch_bearish_threshold,
                config.stoch_max_bars_since_crossing,
            )),
        ];
        Self::new(filters)
    }

    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run the cascade and return the first rejection, if any.
    pub fn first_rejection(
        &self,
        direction: SignalDirection,
        ctx: &FilterContext<'_>,
    ) -> Option<FilterEvaluation> {
        for filter in &self.filters {
            if !filter.enabled() {
                continue;
            }
            let eval = filter.evaluate(direction, ctx);
            if !eval.verdict.is_passed() {
                return Some(eval);
            }
            debug!(filter = filter.name(), %direction, measured = ?eval.measured, "filter passed");
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::BarType;
    use crate::indicators::{make_hlc_bars, Indicator};
    use chrono::{TimeZone, Utc};

    pub fn bar_at_hour(hour: u32) -> Bar {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap();
        Bar {
            bar_type: BarType::new("EUR/USD.SIM", "15-MINUTE-MID-EXTERNAL"),
            open: 1.0800,
            high: 1.0810,
            low: 1.0790,
            close: 1.0805,
            volume: 100.0,
            ts_event: ts,
            ts_init: ts,
        }
    }

    /// DMI(3) and its ADX after a clean ten-bar trend (up or down).
    pub fn trending_dmi(up: bool) -> (Dmi, Adx) {
        let step = if up { 0.01 } else { -0.01 };
        let data: Vec<(f64, f64, f64)> = (0..10)
            .map(|i| {
                let mid = 1.0 + step * i as f64;
                (mid + 0.005, mid - 0.005, mid)
            })
            .collect();
        let mut dmi = Dmi::new(3).unwrap();
        let mut adx = Adx::new(3).unwrap();
        for bar in make_hlc_bars(&data) {
            dmi.handle_bar(&bar);
            adx.update_from(&dmi);
        }
        (dmi, adx)
    }

    pub struct Fixture {
        pub bar: Bar,
        pub crosses: StochasticCrossTracker,
        pub breaker: CircuitBreaker,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                bar: bar_at_hour(12),
                crosses: StochasticCrossTracker::new(),
                breaker: CircuitBreaker::new(true, 3, 10),
            }
        }

        pub fn ctx(&self) -> FilterContext<'_> {
            FilterContext {
                bar: &self.bar,
                fast_ma: 1.0805,
                slow_ma: 1.0800,
                pip_value: 0.0001,
                atr: None,
                dmi: None,
                adx: None,
                stochastic: None,
                stoch_crosses: &self.crosses,
                circuit_breaker: &self.breaker,
            }
        }
    }
}
