//! Volatility signal filter - gates signals by ATR level.
//!
//! Rejects in choppy markets (ATR below `min_strength`) and in extreme
//! markets (ATR above `max_strength`). Both bounds are in price units.
//! A non-positive `max_strength` disables the upper bound.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::signals::SignalDirection;

#[derive(Debug, Clone)]
pub struct AtrFilter {
    enabled: bool,
    min_strength: f64,
    max_strength: f64,
}

impl AtrFilter {
    pub fn new(enabled: bool, min_strength: f64, max_strength: f64) -> Self {
        Self { enabled, min_strength, max_strength }
    }
}

impl SignalFilter for AtrFilter {
    fn name(&self) -> &str {
        "atr_filter"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, _direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let Some(atr) = ctx.atr.and_then(|a| a.value()).filter(|_| self.enabled) else {
            // Disabled or still warming up.
            return FilterEvaluation::passed(self.name());
        };

        let eval = if atr < self.min_strength {
            FilterEvaluation::rejected(
                self.name(),
                format!("atr_too_low (atr={atr:.6} < min={:.6})", self.min_strength),
            )
        } else if self.max_strength > 0.0 && atr > self.max_strength {
            FilterEvaluation::rejected(
                self.name(),
                format!("atr_too_high (atr={atr:.6} > max={:.6})", self.max_strength),
            )
        } else {
            FilterEvaluation::passed(self.name())
        };
        eval.with_measured(atr)
            .with_state("min_strength", self.min_strength)
            .with_state("max_strength", self.max_strength)
    }
}
