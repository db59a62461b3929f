//! Bar: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a bar stream: `{instrument_id}-{bar_spec}`.
///
/// The strategy routes bars by comparing their `BarType` against the primary,
/// DMI and Stochastic subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarType(pub String);

impl BarType {
    pub fn new(instrument_id: &str, bar_spec: &str) -> Self {
        Self(format!("{instrument_id}-{bar_spec}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// OHLCV bar for one instrument over one interval.
///
/// `ts_event` is the bar close time, `ts_init` the time the engine created the
/// bar object. The engine delivers bars in non-decreasing timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub bar_type: BarType,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub ts_event: DateTime<Utc>,
    pub ts_init: DateTime<Utc>,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }
}
