//! Pip-based trailing stop for FX positions.
//!
//! Armed when a bracket's stop leg is submitted. Activates once the open
//! position is `activation_pips` in profit and never deactivates. While active
//! the candidate stop sits `distance_pips` behind the bar close and is only
//! proposed when the ratchet says it is strictly tighter.

use super::StopRatchet;
use crate::domain::{BracketOrder, ClientOrderId, Instrument, Position, PositionSide};
use tracing::info;

/// What the trailing stop wants done this bar.
#[derive(Debug, Clone, PartialEq)]
pub enum TrailingUpdate {
    /// Not armed, not applicable, or not yet in enough profit.
    Inactive,
    /// Active, but the candidate is not tighter than the current stop.
    Hold,
    /// Move the stop order to `trigger_price`.
    Move { order_id: ClientOrderId, trigger_price: f64 },
}

#[derive(Debug, Clone)]
pub struct TrailingStop {
    activation_pips: f64,
    distance_pips: f64,
    active: bool,
    entry_price: Option<f64>,
    stop_order_id: Option<ClientOrderId>,
    ratchet: Option<StopRatchet>,
}

impl TrailingStop {
    pub fn new(activation_pips: f64, distance_pips: f64) -> Self {
        Self {
            activation_pips,
            distance_pips,
            active: false,
            entry_price: None,
            stop_order_id: None,
            ratchet: None,
        }
    }

    /// Track the stop leg of a freshly submitted bracket.
    pub fn arm(&mut self, bracket: &BracketOrder) {
        self.active = false;
        self.entry_price = None;
        self.stop_order_id = Some(bracket.stop_loss.client_order_id.clone());
        self.ratchet = Some(StopRatchet::for_entry(
            bracket.entry.side,
            bracket.stop_loss.trigger_price,
        ));
    }

    /// Evaluate the trailing rule against the latest close.
    pub fn update(&mut self, close: f64, position: Option<&Position>, instrument: &Instrument) -> TrailingUpdate {
        if !instrument.uses_pips() || self.distance_pips <= 0.0 {
            return TrailingUpdate::Inactive;
        }
        let (Some(position), Some(order_id), Some(ratchet)) =
            (position, self.stop_order_id.as_ref(), self.ratchet.as_ref())
        else {
            return TrailingUpdate::Inactive;
        };
        let side = position.side();
        if side != ratchet.side() {
            return TrailingUpdate::Inactive;
        }

        let pip = instrument.pip_value();
        let entry = *self.entry_price.get_or_insert(position.avg_entry_price);
        let profit_pips = match side {
            PositionSide::Long => (close - entry) / pip,
            PositionSide::Short => (entry - close) / pip,
            PositionSide::Flat => return TrailingUpdate::Inactive,
        };

        if !self.active {
            if profit_pips < self.activation_pips {
                return TrailingUpdate::Inactive;
            }
            self.active = true;
            info!(order_id = %order_id, profit_pips, "trailing stop activated");
        }

        let offset = self.distance_pips * pip;
        let candidate = instrument.round_price(match side {
            PositionSide::Long => close - offset,
            _ => close + offset,
        });
        if ratchet.is_tighter(candidate) {
            TrailingUpdate::Move { order_id: order_id.clone(), trigger_price: candidate }
        } else {
            TrailingUpdate::Hold
        }
    }

    /// Record a stop move the engine accepted.
    pub fn confirm(&mut self, trigger_price: f64) {
        if let Some(ratchet) = self.ratchet.as_mut() {
            ratchet.apply(trigger_price);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_stop(&self) -> Option<f64> {
        self.ratchet.as_ref().map(StopRatchet::current_level)
    }

    pub fn stop_order_id(&self) -> Option<&ClientOrderId> {
        self.stop_order_id.as_ref()
    }

    pub fn entry_price(&self) -> Option<f64> {
        self.entry_price
    }

    /// Forget everything about the closed position.
    pub fn reset(&mut self) {
        self.active = false;
        self.entry_price = None;
        self.stop_order_id = None;
        self.ratchet = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetClass, OrderSide};
    use crate::orders::BracketOrderBuilder;

    fn eurusd() -> Instrument {
        Instrument::fx_major("EUR/USD.SIM")
    }

    fn armed(side: OrderSide, entry: f64) -> (TrailingStop, Position) {
        let inst = eurusd();
        let bracket = BracketOrderBuilder::new(&inst, 1, side, 100_000.0)
            .limit(entry)
            .with_stop_loss_pips(25.0)
            .with_take_profit_pips(50.0)
            .build();
        let mut trailing = TrailingStop::new(20.0, 15.0);
        trailing.arm(&bracket);
        let position = match side {
            OrderSide::Buy => Position::new_long("EUR/USD.SIM", 100_000.0, entry),
            OrderSide::Sell => Position::new_short("EUR/USD.SIM", 100_000.0, entry),
        };
        (trailing, position)
    }

    #[test]
    fn inactive_below_activation() {
        let (mut trailing, pos) = armed(OrderSide::Buy, 1.08);
        assert_eq!(trailing.update(1.0810, Some(&pos), &eurusd()), TrailingUpdate::Inactive);
        assert!(!trailing.is_active());
    }

    #[test]
    fn long_activates_and_trails_behind_close() {
        let (mut trailing, pos) = armed(OrderSide::Buy, 1.08);
        let update = trailing.update(1.0825, Some(&pos), &eurusd());
        assert_eq!(
            update,
            TrailingUpdate::Move { order_id: ClientOrderId::new("O-1-SL"), trigger_price: 1.081 }
        );
        trailing.confirm(1.081);
        assert!(trailing.is_active());
        assert_eq!(trailing.last_stop(), Some(1.081));

        // Pullback: stays active, never loosens.
        assert_eq!(trailing.update(1.0815, Some(&pos), &eurusd()), TrailingUpdate::Hold);
        assert!(trailing.is_active());
    }

    #[test]
    fn short_trails_above_close() {
        let (mut trailing, pos) = armed(OrderSide::Sell, 1.08);
        match trailing.update(1.0770, Some(&pos), &eurusd()) {
            TrailingUpdate::Move { trigger_price, .. } => assert_eq!(trigger_price, 1.0785),
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn unconfirmed_move_is_proposed_again() {
        let (mut trailing, pos) = armed(OrderSide::Buy, 1.08);
        let first = trailing.update(1.0825, Some(&pos), &eurusd());
        assert!(matches!(first, TrailingUpdate::Move { .. }));
        // Engine rejected the modification; nothing confirmed.
        assert_eq!(trailing.last_stop(), Some(1.0775));
        assert_eq!(trailing.update(1.0825, Some(&pos), &eurusd()), first);
    }

    #[test]
    fn non_fx_instruments_never_trail() {
        let (mut trailing, pos) = armed(OrderSide::Buy, 1.08);
        let equity = Instrument::new("EUR/USD.SIM", 5, 0.00001, AssetClass::Equity);
        assert_eq!(trailing.update(1.09, Some(&pos), &equity), TrailingUpdate::Inactive);
    }

    #[test]
    fn requires_position_and_stop() {
        let mut trailing = TrailingStop::new(20.0, 15.0);
        let pos = Position::new_long("EUR/USD.SIM", 1.0, 1.08);
        assert_eq!(trailing.update(1.09, Some(&pos), &eurusd()), TrailingUpdate::Inactive);
        let (mut armed, _) = armed(OrderSide::Buy, 1.08);
        assert_eq!(armed.update(1.09, None, &eurusd()), TrailingUpdate::Inactive);
    }

    #[test]
    fn reset_clears_state() {
        let (mut trailing, pos) = armed(OrderSide::Buy, 1.08);
        trailing.update(1.0825, Some(&pos), &eurusd());
        trailing.reset();
        assert!(!trailing.is_active());
        assert_eq!(trailing.stop_order_id(), None);
        assert_eq!(trailing.last_stop(), None);
        assert_eq!(trailing.entry_price(), None);
    }
}
