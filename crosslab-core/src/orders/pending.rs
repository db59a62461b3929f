use crate::signals::{Crossover, SignalDirection};
use chrono::{DateTime, Utc};

/// A signal confirmed at bar close, waiting for the next bar's open.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSignal {
    pub direction: SignalDirection,
    /// Close time of the bar that produced the signal.
    pub bar_ts: DateTime<Utc>,
    pub fast_ma: f64,
    pub slow_ma: f64,
}

impl PendingSignal {
    pub fn new(direction: SignalDirection, bar_ts: DateTime<Utc>, fast_ma: f64, slow_ma: f64) -> Self {
        Self { direction, bar_ts, fast_ma, slow_ma }
    }

    /// The crossover direction that cancels this signal, if `crossover` has one.
    pub fn reversed_by(&self, crossover: Crossover) -> Option<SignalDirection> {
        crossover.direction().filter(|&d| d == self.direction.opposite())
    }
}
