//! Trend-strength filter. Rejects signals while ADX is below a minimum.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::indicators::Indicator;
use crate::signals::SignalDirection;

#[derive(Debug, Clone)]
pub struct AdxFilter {
    enabled: bool,
    min_threshold: f64,
}

impl AdxFilter {
    pub fn new(enabled: bool, min_threshold: f64) -> Self {
        Self { enabled, min_threshold }
    }
}

impl SignalFilter for AdxFilter {
    fn name(&self) -> &str {
        "adx_filter"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, _direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        if !self.enabled {
            return FilterEvaluation::passed(self.name());
        }
        let (Some(dmi), Some(adx)) = (ctx.dmi, ctx.adx) else {
            return FilterEvaluation::passed(self.name());
        };
        let Some(value) = adx.value().filter(|_| dmi.initialized()) else {
            return FilterEvaluation::passed(self.name());
        };

        let eval = if value < self.min_threshold {
            FilterEvaluation::rejected(
                self.name(),
                format!("adx_below_threshold (adx={value:.2} < min={:.2})", self.min_threshold),
            )
        } else {
            FilterEvaluation::passed(self.name())
        };
        eval.with_measured(value)
            .with_state("plus_di", dmi.plus_di())
            .with_state("minus_di", dmi.minus_di())
    }
}
