//! Trend-direction filter. BUY needs +DI >= -DI, SELL needs -DI >= +DI.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::indicators::Indicator;
use crate::signals::SignalDirection;

#[derive(Debug, Clone)]
pub struct DmiTrendFilter {
    enabled: bool,
}

impl DmiTrendFilter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SignalFilter for DmiTrendFilter {
    fn name(&self) -> &str {
        "dmi_filter"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let Some(dmi) = ctx.dmi.filter(|d| self.enabled && d.initialized()) else {
            return FilterEvaluation::passed(self.name());
        };
        let plus = dmi.plus_di();
        let minus = dmi.minus_di();

        let eval = match direction {
            SignalDirection::Buy if minus > plus => FilterEvaluation::rejected(
                self.name(),
                format!("dmi_bearish_trend (+DI={plus:.2} < -DI={minus:.2})"),
            ),
            SignalDirection::Sell if plus > minus => FilterEvaluation::rejected(
                self.name(),
                format!("dmi_bullish_trend (+DI={plus:.2} > -DI={minus:.2})"),
            ),
            _ => FilterEvaluation::passed(self.name()),
        };
        eval.with_measured(plus - minus)
            .with_state("plus_di", plus)
            .with_state("minus_di", minus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{trending_dmi, Fixture};
    use crate::indicators::Dmi;

    #[test]
    fn buy_in_uptrend_passes_sell_rejected() {
        let fx = Fixture::new();
        let (dmi, _) = trending_dmi(true);
        let mut ctx = fx.ctx();
        ctx.dmi = Some(&dmi);
        let filter = DmiTrendFilter::new(true);
        assert!(filter.evaluate(SignalDirection::Buy, &ctx).verdict.is_passed());
        let eval = filter.evaluate(SignalDirection::Sell, &ctx);
        assert!(eval.verdict.reason().unwrap().starts_with("dmi_bullish_trend"));
    }

    #[test]
    fn buy_in_downtrend_rejected() {
        let fx = Fixture::new();
        let (dmi, _) = trending_dmi(false);
        let mut ctx = fx.ctx();
        ctx.dmi = Some(&dmi);
        let eval = DmiTrendFilter::new(true).evaluate(SignalDirection::Buy, &ctx);
        assert!(eval.verdict.reason().unwrap().starts_with("dmi_bearish_trend"));
        assert!(DmiTrendFilter::new(true).evaluate(SignalDirection::Sell, &ctx).verdict.is_passed());
    }

    #[test]
    fn warming_up_passes() {
        let fx = Fixture::new();
        let dmi = Dmi::new(14).unwrap();
        let mut ctx = fx.ctx();
        ctx.dmi = Some(&dmi);
        assert!(DmiTrendFilter::new(true).evaluate(SignalDirection::Sell, &ctx).verdict.is_passed());
    }
}
