//! Circuit breaker gate: rejects every signal while the loss cooldown runs.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::signals::SignalDirection;

#[derive(Debug, Clone)]
pub struct CircuitBreakerFilter {
    enabled: bool,
}

impl CircuitBreakerFilter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SignalFilter for CircuitBreakerFilter {
    fn name(&self) -> &str {
        "circuit_breaker"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, _direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let breaker = ctx.circuit_breaker;
        if !self.enabled || !breaker.is_active() {
            return FilterEvaluation::passed(self.name());
        }
        let reason = format!(
            "circuit_breaker_active (consecutive_losses={}, cooldown_bars_remaining={})",
            breaker.consecutive_losses(),
            breaker.bars_remaining()
        );
        FilterEvaluation::rejected(self.name(), reason)
            .with_measured(breaker.bars_remaining() as f64)
            .with_state("consecutive_losses", breaker.consecutive_losses() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::Fixture;

    #[test]
    fn passes_when_breaker_idle() {
        let fx = Fixture::new();
        let eval = CircuitBreakerFilter::new(true).evaluate(SignalDirection::Buy, &fx.ctx());
        assert!(eval.verdict.is_passed());
    }

    #[test]
    fn rejects_during_cooldown() {
        let mut fx = Fixture::new();
        for _ in 0..3 {
            fx.breaker.record_close(-10.0);
        }
        let eval = CircuitBreakerFilter::new(true).evaluate(SignalDirection::Sell, &fx.ctx());
        let reason = eval.verdict.reason().unwrap();
        assert!(reason.contains("circuit_breaker_active"));
        assert!(reason.contains("consecutive_losses=3"));
        assert!(reason.contains("cooldown_bars_remaining=10"));
    }

    #[test]
    fn disabled_passes_even_when_active() {
        let mut fx = Fixture::new();
        for _ in 0..3 {
            fx.breaker.record_close(0.0);
        }
        let eval = CircuitBreakerFilter::new(false).evaluate(SignalDirection::Buy, &fx.ctx());
        assert!(eval.verdict.is_passed());
    }
}
