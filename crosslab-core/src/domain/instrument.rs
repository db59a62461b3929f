use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetClass {
    Equity,
    Future,
    Forex,
    Crypto,
}

/// Instrument metadata: price precision and minimum price increment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub id: String,
    pub price_precision: u8,
    pub price_increment: f64,
    pub asset_class: AssetClass,
}

impl Instrument {
    pub fn new(
        id: impl Into<String>,
        price_precision: u8,
        price_increment: f64,
        asset_class: AssetClass,
    ) -> Self {
        Self { id: id.into(), price_precision, price_increment, asset_class }
    }

    /// Standard FX instrument quoted to 5 decimals (e.g. EUR/USD).
    pub fn fx_major(id: impl Into<String>) -> Self {
        Self::new(id, 5, 0.00001, AssetClass::Forex)
    }

    /// Value of one pip in price units.
    ///
    /// 5-decimal quotes use 0.0001, 3-decimal quotes (JPY crosses) use 0.01,
    /// anything else falls back to the minimum price increment.
    pub fn pip_value(&self) -> f64 {
        match self.price_precision {
            5 => 0.0001,
            3 => 0.01,
            _ => self.price_increment,
        }
    }

    /// Whether stop-loss / take-profit distances are pip based (trailing applies).
    pub fn uses_pips(&self) -> bool {
        self.asset_class == AssetClass::Forex
    }

    /// Round a price to the instrument's precision.
    pub fn round_price(&self, price: f64) -> f64 {
        let scale = 10f64.powi(i32::from(self.price_precision));
        (price * scale).round() / scale
    }
}
