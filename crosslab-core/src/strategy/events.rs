use crate::domain::Bar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Callback from the engine when the net position for an instrument closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionClosed {
    pub instrument_id: String,
    pub realized_pnl: f64,
    pub ts_closed: DateTime<Utc>,
}

/// Everything the strategy reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyEvent {
    BarArrived(Bar),
    PositionClosed(PositionClosed),
}

impl From<Bar> for StrategyEvent {
    fn from(bar: Bar) -> Self {
        Self::BarArrived(bar)
    }
}

impl From<PositionClosed> for StrategyEvent {
    fn from(closed: PositionClosed) -> Self {
        Self::PositionClosed(closed)
    }
}
