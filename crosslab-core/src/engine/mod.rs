//! Execution engine boundary.
//!
//! The strategy never matches orders or simulates fills. It queries the engine
//! for instrument metadata, the open net position and order status, and sends
//! fire-and-forget commands. Any command may fail; the caller logs the error
//! and carries on with its state untouched.

pub mod recording;

pub use recording::{EngineCommand, RecordingEngine};

use crate::domain::{BracketOrder, ClientOrderId, Instrument, Position};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by an execution engine command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("order {0} not found")]
    OrderNotFound(ClientOrderId),

    #[error("order {0} rejected: {1}")]
    Rejected(ClientOrderId, String),

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

/// Engine-side status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Submitted,
    Accepted,
    PartiallyFilled,
    Filled,
    Canceled,
    Expired,
    Rejected,
}

impl OrderStatus {
    /// Filled, cancelled, expired or rejected: no further fills possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Canceled | Self::Expired | Self::Rejected)
    }
}

/// Capability the strategy needs from a backtest or live engine.
pub trait ExecutionEngine {
    fn instrument(&self, instrument_id: &str) -> Option<Instrument>;

    /// Net open position for the instrument, `None` when flat.
    fn open_position(&self, instrument_id: &str) -> Option<Position>;

    /// `None` when the engine does not know the order.
    fn order_status(&self, order_id: &ClientOrderId) -> Option<OrderStatus>;

    fn submit_bracket(&mut self, bracket: &BracketOrder) -> Result<(), EngineError>;

    fn cancel_order(&mut self, order_id: &ClientOrderId) -> Result<(), EngineError>;

    /// Move the trigger price of a working stop order.
    fn modify_stop(&mut self, order_id: &ClientOrderId, trigger_price: f64) -> Result<(), EngineError>;

    fn close_all_positions(&mut self, instrument_id: &str) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(!OrderStatus::Accepted.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
    }

    #[test]
    fn error_messages() {
        let err = EngineError::OrderNotFound(ClientOrderId::new("O-1-E"));
        assert_eq!(err.to_string(), "order O-1-E not found");
    }
}
