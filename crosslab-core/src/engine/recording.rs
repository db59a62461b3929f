//! In-memory engine that records every command.
//!
//! Used by tests and dry runs. Callers stage instruments, positions and order
//! statuses directly; `fail_next(n)` makes the next `n` mutating calls return
//! `EngineError::Unavailable` without recording them.

use super::{EngineError, ExecutionEngine, OrderStatus};
use crate::domain::{BracketOrder, ClientOrderId, Instrument, OrderSide, Position};
use std::collections::HashMap;

/// A command accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    SubmitBracket(BracketOrder),
    CancelOrder(ClientOrderId),
    ModifyStop { order_id: ClientOrderId, trigger_price: f64 },
    CloseAllPositions { instrument_id: String },
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    instruments: HashMap<String, Instrument>,
    positions: HashMap<String, Position>,
    statuses: HashMap<ClientOrderId, OrderStatus>,
    commands: Vec<EngineCommand>,
    fail_next: usize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.add_instrument(instrument);
        self
    }

    pub fn add_instrument(&mut self, instrument: Instrument) {
        self.instruments.insert(instrument.id.clone(), instrument);
    }

    pub fn set_position(&mut self, position: Position) {
        self.positions.insert(position.instrument_id.clone(), position);
    }

    pub fn clear_position(&mut self, instrument_id: &str) {
        self.positions.remove(instrument_id);
    }

    pub fn set_order_status(&mut self, order_id: &ClientOrderId, status: OrderStatus) {
        self.statuses.insert(order_id.clone(), status);
    }

    /// Fill a bracket's entry leg and open the matching position.
    ///
    /// Market entries fill at `price`; limit entries fill at their limit.
    pub fn fill_entry(&mut self, bracket: &BracketOrder, price: f64) {
        let fill_price = bracket.entry_price().unwrap_or(price);
        self.statuses.insert(bracket.entry.client_order_id.clone(), OrderStatus::Filled);
        let position = match bracket.entry.side {
            OrderSide::Buy => Position::new_long(&bracket.instrument_id, bracket.entry.quantity, fill_price),
            OrderSide::Sell => Position::new_short(&bracket.instrument_id, bracket.entry.quantity, fill_price),
        };
        self.set_position(position);
    }

    /// Fail the next `n` mutating calls.
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }

    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    pub fn brackets(&self) -> Vec<&BracketOrder> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                EngineCommand::SubmitBracket(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> Vec<&ClientOrderId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                EngineCommand::CancelOrder(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Trigger prices sent through `modify_stop`, in order.
    pub fn stop_modifications(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                EngineCommand::ModifyStop { trigger_price, .. } => Some(*trigger_price),
                _ => None,
            })
            .collect()
    }

    pub fn close_all_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, EngineCommand::CloseAllPositions { .. }))
            .count()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    fn check_failure(&mut self) -> Result<(), EngineError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(EngineError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

impl ExecutionEngine for RecordingEngine {
    fn instrument(&self, instrument_id: &str) -> Option<Instrument> {
        self.instruments.get(instrument_id).cloned()
    }

    fn open_position(&self, instrument_id: &str) -> Option<Position> {
        self.positions.get(instrument_id).filter(|p| !p.is_flat()).cloned()
    }

    fn order_status(&self, order_id: &ClientOrderId) -> Option<OrderStatus> {
        self.statuses.get(order_id).copied()
    }

    fn submit_bracket(&mut self, bracket: &BracketOrder) -> Result<(), EngineError> {
        self.check_failure()?;
        for id in [
            &bracket.entry.client_order_id,
            &bracket.stop_loss.client_order_id,
            &bracket.take_profit.client_order_id,
        ] {
            self.statuses.insert(id.clone(), OrderStatus::Accepted);
        }
        self.commands.push(EngineCommand::SubmitBracket(bracket.clone()));
        Ok(())
    }

    fn cancel_order(&mut self, order_id: &ClientOrderId) -> Result<(), EngineError> {
        self.check_failure()?;
        match self.statuses.get_mut(order_id) {
            Some(status) if !status.is_terminal() => *status = OrderStatus::Canceled,
            Some(_) => {}
            None => return Err(EngineError::OrderNotFound(order_id.clone())),
        }
        self.commands.push(EngineCommand::CancelOrder(order_id.clone()));
        Ok(())
    }

    fn modify_stop(&mut self, order_id: &ClientOrderId, trigger_price: f64) -> Result<(), EngineError> {
        self.check_failure()?;
        if !self.statuses.contains_key(order_id) {
            return Err(EngineError::OrderNotFound(order_id.clone()));
        }
        self.commands.push(EngineCommand::ModifyStop { order_id: order_id.clone(), trigger_price });
        Ok(())
    }

    fn close_all_positions(&mut self, instrument_id: &str) -> Result<(), EngineError> {
        self.check_failure()?;
        self.positions.remove(instrument_id);
        self.commands.push(EngineCommand::CloseAllPositions { instrument_id: instrument_id.to_string() });
        Ok(())
    }
}
