//! Crossover-magnitude filter: the fast/slow gap must be at least N pips.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::signals::SignalDirection;

#[derive(Debug, Clone)]
pub struct CrossoverThresholdFilter {
    threshold_pips: f64,
}

impl CrossoverThresholdFilter {
    pub fn new(threshold_pips: f64) -> Self {
        Self { threshold_pips }
    }
}

impl SignalFilter for CrossoverThresholdFilter {
    fn name(&self) -> &str {
        "crossover_threshold"
    }

    /// A zero threshold disables the check.
    fn enabled(&self) -> bool {
        self.threshold_pips > 0.0
    }

    fn evaluate(&self, _direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        if !self.enabled() || ctx.pip_value <= 0.0 {
            return FilterEvaluation::passed(self.name());
        }
        let diff = (ctx.fast_ma - ctx.slow_ma).abs();
        let diff_pips = diff / ctx.pip_value;
        let required = self.threshold_pips * ctx.pip_value;

        let eval = if diff < required {
            FilterEvaluation::rejected(
                self.name(),
                format!(
                    "crossover_threshold_not_met (diff={diff_pips:.2} pips < threshold={:.2} pips)",
                    self.threshold_pips
                ),
            )
        } else {
            FilterEvaluation::passed(self.name())
        };
        eval.with_measured(diff_pips).with_state("threshold_pips", self.threshold_pips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::Fixture;

    #[test]
    fn rejects_half_pip_gap_with_one_pip_threshold() {
        let fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.fast_ma = 1.080_05;
        ctx.slow_ma = 1.080_00;
        let eval = CrossoverThresholdFilter::new(1.0).evaluate(SignalDirection::Buy, &ctx);
        assert!(eval.verdict.reason().unwrap().contains("crossover_threshold_not_met"));
        assert!((eval.measured.unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn passes_wide_gap() {
        let fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.fast_ma = 1.0800;
        ctx.slow_ma = 1.0805; // bearish side, 5 pips
        let eval = CrossoverThresholdFilter::new(1.0).evaluate(SignalDirection::Sell, &ctx);
        assert!(eval.verdict.is_passed());
    }

    #[test]
    fn jpy_pip_scale() {
        let fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.pip_value = 0.01;
        ctx.fast_ma = 151.004;
        ctx.slow_ma = 151.000; // 0.4 pips
        let eval = CrossoverThresholdFilter::new(0.5).evaluate(SignalDirection::Buy, &ctx);
        assert!(!eval.verdict.is_passed());
    }

    #[test]
    fn zero_threshold_is_disabled() {
        let filter = CrossoverThresholdFilter::new(0.0);
        assert!(!filter.enabled());
        let fx = Fixture::new();
        assert!(filter.evaluate(SignalDirection::Buy, &fx.ctx()).verdict.is_passed());
    }
}
