//! Order lifecycle state machine.
//!
//! `Flat -> PendingSignal -> OrderSubmitted -> PositionOpen -> Flat`
//!
//! Fills are never reported to the lifecycle. Whether a position is open is
//! re-derived from the engine every bar, and `PositionClosed` callbacks only
//! feed the circuit breaker and reset the trailing stop. The close of a
//! position flattened by a reversal leaves the new bracket's trailing stop armed.
//!
//! Engine failures are logged with `warn!` and leave tracking state as it was.

use super::{
    BracketOrderBuilder, CircuitBreaker, EntryOrderTracker, PendingSignal, PositionDecision,
    PositionLimit, TrailingStop, TrailingUpdate,
};
use crate::domain::{Bar, ClientOrderId, Instrument, OrderIdGenerator, Position};
use crate::engine::{EngineError, ExecutionEngine};
use crate::signals::{Crossover, SignalDirection};
use crate::strategy::StrategyConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Coarse lifecycle state, derived from pending/tracking state and the
/// engine's open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    Flat,
    PendingSignal,
    OrderSubmitted,
    PositionOpen { trailing_active: bool },
}

/// The slice of `StrategyConfig` the lifecycle acts on.
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub instrument_id: String,
    pub trade_size: f64,
    pub stop_loss_pips: f64,
    pub take_profit_pips: f64,
    pub use_limit_orders: bool,
    pub limit_order_timeout_bars: u64,
    pub enforce_position_limit: bool,
    pub allow_position_reversal: bool,
    pub trailing_stop_activation_pips: f64,
    pub trailing_stop_distance_pips: f64,
    pub circuit_breaker_enabled: bool,
    pub max_consecutive_losses: usize,
    pub cooldown_bars: usize,
    /// Attached to every bracket for correlation.
    pub order_tags: Vec<String>,
}

impl LifecycleSettings {
    pub fn from_config(config: &StrategyConfig, order_tags: Vec<String>) -> Self {
        Self {
            instrument_id: config.instrument_id.clone(),
            trade_size: config.trade_size,
            stop_loss_pips: config.stop_loss_pips,
            take_profit_pips: config.take_profit_pips,
            use_limit_orders: config.use_limit_orders,
            limit_order_timeout_bars: config.limit_order_timeout_bars,
            enforce_position_limit: config.enforce_position_limit,
            allow_position_reversal: config.allow_position_reversal,
            trailing_stop_activation_pips: config.trailing_stop_activation_pips,
            trailing_stop_distance_pips: config.trailing_stop_distance_pips,
            circuit_breaker_enabled: config.circuit_breaker_enabled,
            max_consecutive_losses: config.max_consecutive_losses,
            cooldown_bars: config.cooldown_bars,
            order_tags,
        }
    }
}

/// Result of handing a filter-approved signal to the lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalOutcome {
    /// Stored; the limit bracket goes out at the next bar's open.
    Pending,
    /// Market bracket submitted immediately.
    Submitted(ClientOrderId),
    /// Opposite position closed, no new entry.
    CloseOnly,
    /// Blocked by the position limit.
    Rejected { reason: String },
    /// The engine refused a command; nothing was placed.
    Failed,
}

/// What happened to the pending signal on the bar after it was confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingResolution {
    Reversed { signal: PendingSignal, by: SignalDirection },
    Submitted { signal: PendingSignal, order_id: ClientOrderId },
    CloseOnly { signal: PendingSignal },
    Rejected { signal: PendingSignal, reason: String },
    Failed { signal: PendingSignal },
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Limit(f64),
    Market(f64),
}

#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    settings: LifecycleSettings,
    limit: PositionLimit,
    pending: Option<PendingSignal>,
    entries: EntryOrderTracker,
    trailing: TrailingStop,
    breaker: CircuitBreaker,
    ids: OrderIdGenerator,
    bar_count: u64,
    /// A reversal flattened the old position and armed a new bracket; the
    /// next close report belongs to the old position.
    reversal_close_pending: bool,
}

impl OrderLifecycle {
    pub fn new(settings: LifecycleSettings) -> Self {
        Self {
            limit: PositionLimit::new(settings.enforce_position_limit, settings.allow_position_reversal),
            pending: None,
            entries: EntryOrderTracker::new(settings.limit_order_timeout_bars),
            trailing: TrailingStop::new(
                settings.trailing_stop_activation_pips,
                settings.trailing_stop_distance_pips,
            ),
            breaker: CircuitBreaker::new(
                settings.circuit_breaker_enabled,
                settings.max_consecutive_losses,
                settings.cooldown_bars,
            ),
            ids: OrderIdGenerator::new(),
            bar_count: 0,
            reversal_close_pending: false,
            settings,
        }
    }

    // ── Per-bar steps ────────────────────────────────────────────────

    /// Steps 1 and 2 of a primary bar: entry timeouts, then breaker countdown.
    pub fn begin_bar<E: ExecutionEngine + ?Sized>(&mut self, engine: &mut E) {
        self.bar_count += 1;
        self.entries.prune(engine);
        for order_id in self.entries.expired(self.bar_count) {
            match engine.cancel_order(&order_id) {
                Ok(()) => {
                    info!(%order_id, bar = self.bar_count, "limit entry timed out, cancelled");
                    self.entries.remove(&order_id);
                }
                Err(err) => warn!(%order_id, error = %err, "failed to cancel timed-out entry"),
            }
        }
        self.breaker.on_bar();
    }

    /// Execute or cancel the signal confirmed on the previous bar.
    pub fn resolve_pending<E: ExecutionEngine + ?Sized>(
        &mut self,
        crossover: Crossover,
        bar: &Bar,
        instrument: &Instrument,
        engine: &mut E,
    ) -> Option<PendingResolution> {
        let signal = self.pending.take()?;

        if let Some(by) = signal.reversed_by(crossover) {
            info!(pending = %signal.direction, by = %by, "pending signal reversed before execution");
            return Some(PendingResolution::Reversed { signal, by });
        }

        let position = engine.open_position(&self.settings.instrument_id);
        let decision = self.limit.check(signal.direction, position.as_ref());
        let resolution = match self.execute(signal.direction, decision, Entry::Limit(bar.open), instrument, engine) {
            SignalOutcome::Submitted(order_id) => PendingResolution::Submitted { signal, order_id },
            SignalOutcome::CloseOnly => PendingResolution::CloseOnly { signal },
            SignalOutcome::Rejected { reason } => PendingResolution::Rejected { signal, reason },
            SignalOutcome::Failed | SignalOutcome::Pending => PendingResolution::Failed { signal },
        };
        Some(resolution)
    }

    /// Act on a signal that passed every filter.
    ///
    /// Limit mode stores it as the pending signal (after cancelling working
    /// entries). Market mode submits a bracket now, referenced to the
    /// crossover bar's close.
    pub fn accept_signal<E: ExecutionEngine + ?Sized>(
        &mut self,
        direction: SignalDirection,
        bar: &Bar,
        fast_ma: f64,
        slow_ma: f64,
        instrument: &Instrument,
        engine: &mut E,
    ) -> SignalOutcome {
        let position = engine.open_position(&self.settings.instrument_id);
        let decision = self.limit.check(direction, position.as_ref());

        if !self.settings.use_limit_orders {
            return self.execute(direction, decision, Entry::Market(bar.close), instrument, engine);
        }

        match decision {
            PositionDecision::Rejected { reason } => SignalOutcome::Rejected { reason },
            PositionDecision::CloseOnly => self.close_only(direction, engine),
            _ => {
                self.cancel_working_entries(engine);
                self.pending = Some(PendingSignal::new(direction, bar.ts_event, fast_ma, slow_ma));
                debug!(%direction, decision = decision.label(), "signal pending until next bar");
                SignalOutcome::Pending
            }
        }
    }

    /// Step 6: move the trailing stop if the ratchet allows it.
    pub fn update_trailing<E: ExecutionEngine + ?Sized>(
        &mut self,
        bar: &Bar,
        instrument: &Instrument,
        engine: &mut E,
    ) {
        let position = engine.open_position(&self.settings.instrument_id);
        if let TrailingUpdate::Move { order_id, trigger_price } =
            self.trailing.update(bar.close, position.as_ref(), instrument)
        {
            match engine.modify_stop(&order_id, trigger_price) {
                Ok(()) => {
                    debug!(%order_id, trigger_price, "trailing stop moved");
                    self.trailing.confirm(trigger_price);
                }
                Err(err) => warn!(%order_id, trigger_price, error = %err, "failed to move trailing stop"),
            }
        }
    }

    // ── Callbacks ────────────────────────────────────────────────────

    /// Returns `true` when this close tripped the circuit breaker.
    pub fn on_position_closed(&mut self, realized_pnl: f64) -> bool {
        if std::mem::take(&mut self.reversal_close_pending) {
            debug!("reversed position closed, trailing stop kept for the new bracket");
        } else {
            self.trailing.reset();
        }
        self.breaker.record_close(realized_pnl)
    }

    /// Cancel working entries and flatten the instrument.
    pub fn stop<E: ExecutionEngine + ?Sized>(&mut self, engine: &mut E) {
        self.pending = None;
        self.cancel_working_entries(engine);
        if engine.open_position(&self.settings.instrument_id).is_some() {
            if let Err(err) = engine.close_all_positions(&self.settings.instrument_id) {
                warn!(instrument = %self.settings.instrument_id, error = %err, "failed to close position on stop");
            }
        }
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.entries.clear();
        self.trailing.reset();
        self.breaker.reset();
        self.ids.reset();
        self.bar_count = 0;
        self.reversal_close_pending = false;
    }

    // ── Introspection ────────────────────────────────────────────────

    pub fn state(&self, position: Option<&Position>) -> LifecycleState {
        if position.is_some_and(|p| !p.is_flat()) {
            LifecycleState::PositionOpen { trailing_active: self.trailing.is_active() }
        } else if self.pending.is_some() {
            LifecycleState::PendingSignal
        } else if !self.entries.is_empty() {
            LifecycleState::OrderSubmitted
        } else {
            LifecycleState::Flat
        }
    }

    pub fn pending(&self) -> Option<&PendingSignal> {
        self.pending.as_ref()
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn entries(&self) -> &EntryOrderTracker {
        &self.entries
    }

    pub fn trailing(&self) -> &TrailingStop {
        &self.trailing
    }

    pub fn bar_count(&self) -> u64 {
        self.bar_count
    }

    // ── Internals ────────────────────────────────────────────────────

    fn execute<E: ExecutionEngine + ?Sized>(
        &mut self,
        direction: SignalDirection,
        decision: PositionDecision,
        entry: Entry,
        instrument: &Instrument,
        engine: &mut E,
    ) -> SignalOutcome {
        if let PositionDecision::Rejected { reason } = decision {
            return SignalOutcome::Rejected { reason };
        }
        if !decision.submits_entry() {
            return self.close_only(direction, engine);
        }
        let reversing = decision.closes_position();
        if reversing {
            if let Err(err) = engine.close_all_positions(&self.settings.instrument_id) {
                warn!(%direction, error = %err, "failed to close position before reversal");
                return SignalOutcome::Failed;
            }
        }
        let outcome = self.submit(direction, entry, instrument, engine);
        if reversing && matches!(outcome, SignalOutcome::Submitted(_)) {
            self.reversal_close_pending = true;
        }
        outcome
    }

    fn close_only<E: ExecutionEngine + ?Sized>(
        &mut self,
        direction: SignalDirection,
        engine: &mut E,
    ) -> SignalOutcome {
        match engine.close_all_positions(&self.settings.instrument_id) {
            Ok(()) => {
                info!(%direction, "opposite position closed, no new entry");
                SignalOutcome::CloseOnly
            }
            Err(err) => {
                warn!(%direction, error = %err, "failed to close opposite position");
                SignalOutcome::Failed
            }
        }
    }

    fn submit<E: ExecutionEngine + ?Sized>(
        &mut self,
        direction: SignalDirection,
        entry: Entry,
        instrument: &Instrument,
        engine: &mut E,
    ) -> SignalOutcome {
        match self.submit_bracket(direction, entry, instrument, engine) {
            Ok(order_id) => SignalOutcome::Submitted(order_id),
            Err(err) => {
                warn!(%direction, error = %err, "bracket submission failed, no order placed");
                SignalOutcome::Failed
            }
        }
    }

    fn submit_bracket<E: ExecutionEngine + ?Sized>(
        &mut self,
        direction: SignalDirection,
        entry: Entry,
        instrument: &Instrument,
        engine: &mut E,
    ) -> Result<ClientOrderId, EngineError> {
        let sequence = self.ids.next_sequence();
        let mut builder =
            BracketOrderBuilder::new(instrument, sequence, direction.side(), self.settings.trade_size)
                .with_stop_loss_pips(self.settings.stop_loss_pips)
                .with_take_profit_pips(self.settings.take_profit_pips);
        builder = match entry {
            Entry::Limit(price) => builder.limit(price),
            Entry::Market(reference) => builder.market(reference),
        };
        for tag in &self.settings.order_tags {
            builder = builder.with_tag(tag.clone());
        }
        let bracket = builder.with_tag(format!("signal={direction}")).build();

        engine.submit_bracket(&bracket)?;

        let order_id = bracket.entry.client_order_id.clone();
        self.entries.track(order_id.clone(), self.bar_count, matches!(entry, Entry::Limit(_)));
        self.trailing.arm(&bracket);
        info!(
            %order_id,
            %direction,
            entry = ?bracket.entry.kind,
            stop_loss = bracket.stop_loss.trigger_price,
            take_profit = bracket.take_profit.price,
            "bracket submitted"
        );
        Ok(order_id)
    }

    fn cancel_working_entries<E: ExecutionEngine + ?Sized>(&mut self, engine: &mut E) {
        for order_id in self.entries.order_ids() {
            match engine.cancel_order(&order_id) {
                Ok(()) => self.entries.remove(&order_id),
                Err(err) => warn!(%order_id, error = %err, "failed to cancel working entry"),
            }
        }
    }
}
