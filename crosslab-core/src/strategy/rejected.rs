//! Audit log of signals that did not become orders.

use crate::signals::SignalDirection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a signal that did not produce an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionAction {
    /// Blocked by a filter or the position limit.
    Rejected,
    /// Closed the opposite position instead of opening a new one.
    CloseOnly,
    /// A pending signal cancelled by an opposite crossover.
    Cancelled,
}

impl RejectionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::CloseOnly => "close_only",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RejectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedSignalRecord {
    /// When the strategy processed the bar (`ts_init`).
    pub timestamp: DateTime<Utc>,
    /// Close time of the bar the signal came from (`ts_event`).
    pub bar_close_time: DateTime<Utc>,
    pub signal_type: SignalDirection,
    pub action: RejectionAction,
    pub reason: String,
    pub fast_ma: f64,
    pub slow_ma: f64,
}
