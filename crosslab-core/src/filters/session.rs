//! Time-of-day filter: trading-hours window plus explicitly excluded hours.
//!
//! Hours are evaluated in the market timezone supplied by a `MarketClock`.
//! The window is `[start, end)` and wraps past midnight when `start > end`.

use super::{FilterContext, FilterEvaluation, SignalFilter};
use crate::clock::MarketClock;
use crate::signals::SignalDirection;
use tracing::warn;

/// Trading-hours window in local hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingWindow {
    start: u32,
    end: u32,
    all_day: bool,
}

impl TradingWindow {
    /// Build a window, degrading to all-day on invalid or degenerate input.
    pub fn new(start: u32, end: u32) -> Self {
        if start > 24 || end > 24 {
            warn!(start, end, "trading hours outside 0-24, trading all day");
            return Self::all_day();
        }
        if start == end || (start % 24 == end % 24) {
            if !(start == 0 && end == 24) {
                warn!(start, end, "trading hours start equals end, trading all day");
            }
            return Self::all_day();
        }
        Self { start, end, all_day: false }
    }

    pub fn all_day() -> Self {
        Self { start: 0, end: 24, all_day: true }
    }

    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.all_day {
            return true;
        }
        if self.start < self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

#[derive(Debug)]
pub struct TimeOfDayFilter {
    enabled: bool,
    window: TradingWindow,
    excluded_hours: Vec<u32>,
    clock: Box<dyn MarketClock>,
}

impl TimeOfDayFilter {
    pub fn new(
        enabled: bool,
        window: TradingWindow,
        excluded_hours: &[u32],
        clock: Box<dyn MarketClock>,
    ) -> Self {
        let mut excluded = Vec::with_capacity(excluded_hours.len());
        for &hour in excluded_hours {
            if hour > 23 {
                warn!(hour, "ignoring excluded hour outside 0-23");
            } else if !excluded.contains(&hour) {
                excluded.push(hour);
            }
        }
        Self { enabled, window, excluded_hours: excluded, clock }
    }

    pub fn window(&self) -> TradingWindow {
        self.window
    }
}

impl SignalFilter for TimeOfDayFilter {
    fn name(&self) -> &str {
        "time_filter"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&self, _direction: SignalDirection, ctx: &FilterContext<'_>) -> FilterEvaluation {
        if !self.enabled {
            return FilterEvaluation::passed(self.name());
        }
        let hour = self.clock.local_hour(ctx.bar.ts_event);
        let zone = self.clock.zone_name();

        let eval = if self.excluded_hours.contains(&hour) {
            FilterEvaluation::rejected(self.name(), format!("excluded_hour (hour={hour} {zone})"))
        } else if !self.window.contains(hour) {
            FilterEvaluation::rejected(
                self.name(),
                format!(
                    "outside_trading_hours (hour={hour} {zone}, window={}-{})",
                    self.window.start, self.window.end
                ),
            )
        } else {
            FilterEvaluation::passed(self.name())
        };
        eval.with_measured(f64::from(hour))
    }
}
