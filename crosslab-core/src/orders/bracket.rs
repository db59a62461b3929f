use crate::domain::{
    BracketOrder, EntryKind, EntryOrder, Instrument, OrderIdGenerator, OrderSide, StopLossOrder,
    TakeProfitOrder,
};

/// Bracket order builder
///
/// Stop-loss and take-profit are expressed in pips from the entry (or, for a
/// market entry, from a reference price) and rounded to the instrument's
/// precision. Leg ids are `O-{sequence}-E`, `O-{sequence}-SL`, `O-{sequence}-TP`.
pub struct BracketOrderBuilder<'a> {
    instrument: &'a Instrument,
    sequence: u64,
    side: OrderSide,
    quantity: f64,
    entry: EntryKind,
    reference_price: f64,
    stop_loss_pips: f64,
    take_profit_pips: f64,
    tags: Vec<String>,
}

impl<'a> BracketOrderBuilder<'a> {
    pub fn new(instrument: &'a Instrument, sequence: u64, side: OrderSide, quantity: f64) -> Self {
        Self {
            instrument,
            sequence,
            side,
            quantity,
            entry: EntryKind::Market,
            reference_price: 0.0,
            stop_loss_pips: 0.0,
            take_profit_pips: 0.0,
            tags: Vec::new(),
        }
    }

    /// Market entry. `reference_price` anchors the SL/TP distances.
    pub fn market(mut self, reference_price: f64) -> Self {
        self.entry = EntryKind::Market;
        self.reference_price = reference_price;
        self
    }

    pub fn limit(mut self, price: f64) -> Self {
        let price = self.instrument.round_price(price);
        self.entry = EntryKind::Limit { price };
        self.reference_price = price;
        self
    }

    pub fn with_stop_loss_pips(mut self, pips: f64) -> Self {
        self.stop_loss_pips = pips;
        self
    }

    pub fn with_take_profit_pips(mut self, pips: f64) -> Self {
        self.take_profit_pips = pips;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Protective prices `(stop_loss, take_profit)` for the configured side.
    pub fn protective_prices(&self) -> (f64, f64) {
        let pip = self.instrument.pip_value();
        let sl_offset = self.stop_loss_pips * pip;
        let tp_offset = self.take_profit_pips * pip;
        let (sl, tp) = match self.side {
            OrderSide::Buy => (self.reference_price - sl_offset, self.reference_price + tp_offset),
            OrderSide::Sell => (self.reference_price + sl_offset, self.reference_price - tp_offset),
        };
        (self.instrument.round_price(sl), self.instrument.round_price(tp))
    }

    pub fn build(self) -> BracketOrder {
        let (stop_price, target_price) = self.protective_prices();
        BracketOrder {
            instrument_id: self.instrument.id.clone(),
            entry: EntryOrder {
                client_order_id: OrderIdGenerator::leg(self.sequence, "E"),
                side: self.side,
                quantity: self.quantity,
                kind: self.entry,
            },
            stop_loss: StopLossOrder {
                client_order_id: OrderIdGenerator::leg(self.sequence, "SL"),
                trigger_price: stop_price,
            },
            take_profit: TakeProfitOrder {
                client_order_id: OrderIdGenerator::leg(self.sequence, "TP"),
                price: target_price,
            },
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssetClass;

    #[test]
    fn test_long_limit_bracket() {
        let eurusd = Instrument::fx_major("EUR/USD.SIM");
        let bracket = BracketOrderBuilder::new(&eurusd, 7, OrderSide::Buy, 100_000.0)
            .limit(1.08003)
            .with_stop_loss_pips(25.0)
            .with_take_profit_pips(50.0)
            .with_tag("MA_CROSS")
            .build();

        assert_eq!(bracket.entry.client_order_id.as_str(), "O-7-E");
        assert_eq!(bracket.stop_loss.client_order_id.as_str(), "O-7-SL");
        assert_eq!(bracket.take_profit.client_order_id.as_str(), "O-7-TP");
        assert_eq!(bracket.entry_price(), Some(1.08003));
        assert_eq!(bracket.stop_loss.trigger_price, 1.07753);
        assert_eq!(bracket.take_profit.price, 1.08503);
        assert_eq!(bracket.tags, vec!["MA_CROSS".to_string()]);
    }

    #[test]
    fn test_short_market_bracket_uses_reference_price() {
        let eurusd = Instrument::fx_major("EUR/USD.SIM");
        let bracket = BracketOrderBuilder::new(&eurusd, 1, OrderSide::Sell, 50_000.0)
            .market(1.1)
            .with_stop_loss_pips(20.0)
            .with_take_profit_pips(40.0)
            .build();

        assert_eq!(bracket.entry.kind, EntryKind::Market);
        assert_eq!(bracket.entry_price(), None);
        assert_eq!(bracket.stop_loss.trigger_price, 1.102);
        assert_eq!(bracket.take_profit.price, 1.096);
    }

    #[test]
    fn test_jpy_pip_scale() {
        let usdjpy = Instrument::new("USD/JPY.SIM", 3, 0.001, AssetClass::Forex);
        let bracket = BracketOrderBuilder::new(&usdjpy, 1, OrderSide::Buy, 1.0)
            .limit(150.0)
            .with_stop_loss_pips(25.0)
            .with_take_profit_pips(50.0)
            .build();
        assert_eq!(bracket.stop_loss.trigger_price, 149.75);
        assert_eq!(bracket.take_profit.price, 150.5);
    }
}
