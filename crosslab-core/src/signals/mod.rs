//! Signal generation: detects market events, emits directional intent.
//!
//! Signals are portfolio-agnostic: the crossover detector sees only moving
//! average values and the crossing tracker only %K/%D readings. Position
//! state is consulted later by the order lifecycle.

pub mod crossover;
pub mod stoch_cross;

pub use crossover::{Crossover, CrossoverDetector};
pub use stoch_cross::StochasticCrossTracker;

use crate::domain::OrderSide;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional intent of a crossover signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn side(self) -> OrderSide {
        match self {
            SignalDirection::Buy => OrderSide::Buy,
            SignalDirection::Sell => OrderSide::Sell,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            SignalDirection::Buy => SignalDirection::Sell,
            SignalDirection::Sell => SignalDirection::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }

    /// Name of the crossover that produces this direction.
    pub fn crossover_name(self) -> &'static str {
        match self {
            SignalDirection::Buy => "bullish",
            SignalDirection::Sell => "bearish",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
