//! Order request types sent to the execution engine.
//!
//! These are commands, not order-book state: fills, rejections and OCO handling
//! belong to the engine. The strategy only keeps the client ids it assigned.

use super::ids::ClientOrderId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the entry leg of a bracket executes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Fill immediately at market.
    Market,
    /// Fill at `price` or better.
    Limit { price: f64 },
}

/// Entry leg of a bracket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryOrder {
    pub client_order_id: ClientOrderId,
    pub side: OrderSide,
    pub quantity: f64,
    pub kind: EntryKind,
}

/// Protective stop leg (stop-market, opposite side of the entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossOrder {
    pub client_order_id: ClientOrderId,
    pub trigger_price: f64,
}

/// Profit target leg (limit, opposite side of the entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitOrder {
    pub client_order_id: ClientOrderId,
    pub price: f64,
}

/// Entry + stop-loss + take-profit, submitted as one OTO/OCO unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketOrder {
    pub instrument_id: String,
    pub entry: EntryOrder,
    pub stop_loss: StopLossOrder,
    pub take_profit: TakeProfitOrder,
    /// Correlation tags (strategy, direction, config fingerprint).
    pub tags: Vec<String>,
}

impl BracketOrder {
    /// Reference entry price: the limit price, or `None` for market entries.
    pub fn entry_price(&self) -> Option<f64> {
        match self.entry.kind {
            EntryKind::Limit { price } => Some(price),
            EntryKind::Market => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opposite_and_labels() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
        assert_eq!(OrderSide::Buy.to_string(), "BUY");
    }

    #[test]
    fn side_serializes_screaming() {
        assert_eq!(serde_json::to_string(&OrderSide::Sell).unwrap(), "\"SELL\"");
    }
}
