//! Momentum filter on the Stochastic oscillator.
//!
//! BUY: %K > %D, both above the bullish threshold, and a bullish %K/%D cross
//! within `max_bars_since_crossing` Stochastic bars. SELL is mirrored with the
//! bearish threshold and a bearish cross.
//!
//! Accepts while the oscillator warms up. When no cross in the required
//! direction has been seen yet, momentum and level still apply and only the
//! recency check is skipped.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::indicators::Indicator;
use crate::signals::SignalDirection;

#[derive(Debug, Clone)]
pub struct StochasticFilter {
    enabled: bool,
    bullish_threshold: f64,
    bearish_threshold: f64,
    max_bars_since_crossing: usize,
}

impl StochasticFilter {
    pub fn new(
        enabled: bool,
        bullish_threshold: f64,
        bearish_threshold: f64,
        max_bars_since_crossing: usize,
    ) -> Self {
        Self { enabled, bullish_threshold, bearish_threshold, max_bars_since_crossing }
    }
}

impl SignalFilter for StochasticFilter {
    fn name(&self) -> &str {
        "stochastic_filter"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let Some(stoch) = ctx.stochastic.filter(|s| self.enabled && s.initialized()) else {
            return FilterEvaluation::passed(self.name());
        };
        let k = stoch.value_k();
        let d = stoch.value_d();

        let (bars_since, momentum_ok, level_ok, level_desc) = match direction {
            SignalDirection::Buy => (
                ctx.stoch_crosses.bars_since_bullish(),
                k > d,
                k > self.bullish_threshold && d > self.bullish_threshold,
                format!("above bullish threshold {:.1}", self.bullish_threshold),
            ),
            SignalDirection::Sell => (
                ctx.stoch_crosses.bars_since_bearish(),
                k < d,
                k < self.bearish_threshold && d < self.bearish_threshold,
                format!("below bearish threshold {:.1}", self.bearish_threshold),
            ),
        };

        let too_old = bars_since.filter(|&n| n > self.max_bars_since_crossing);
        let eval = if !momentum_ok {
            FilterEvaluation::rejected(
                self.name(),
                format!("stochastic_momentum_against_{direction} (k={k:.2}, d={d:.2})"),
            )
        } else if !level_ok {
            FilterEvaluation::rejected(
                self.name(),
                format!("stochastic_level_not_met (k={k:.2}, d={d:.2}, need {level_desc})"),
            )
        } else if let Some(bars_since) = too_old {
            FilterEvaluation::rejected(
                self.name(),
                format!(
                    "stochastic_crossing_too_old (bars_since={bars_since} > max={})",
                    self.max_bars_since_crossing
                ),
            )
        } else {
            FilterEvaluation::passed(self.name())
        };
        let eval = eval.with_measured(k).with_state("d", d);
        match bars_since {
            Some(n) => eval.with_state("bars_since_crossing", n as f64),
            None => eval,
        }
    }
}
