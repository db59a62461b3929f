use serde::{Deserialize, Serialize};

/// Position side (semantic representation of signed quantity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
    Flat,
}

/// Net open position for one instrument, as reported by the execution engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub instrument_id: String,
    /// Signed quantity: positive long, negative short.
    pub quantity: f64,
    pub avg_entry_price: f64,
}

impl Position {
    pub fn new_long(instrument_id: impl Into<String>, quantity: f64, avg_entry_price: f64) -> Self {
        Self { instrument_id: instrument_id.into(), quantity: quantity.abs(), avg_entry_price }
    }

    pub fn new_short(instrument_id: impl Into<String>, quantity: f64, avg_entry_price: f64) -> Self {
        Self { instrument_id: instrument_id.into(), quantity: -quantity.abs(), avg_entry_price }
    }

    pub fn side(&self) -> PositionSide {
        if self.quantity > 0.0 {
            PositionSide::Long
        } else if self.quantity < 0.0 {
            PositionSide::Short
        } else {
            PositionSide::Flat
        }
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0.0
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.avg_entry_price)
    }
}
