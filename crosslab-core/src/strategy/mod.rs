//! Moving-average crossover strategy orchestrator.
//!
//! Per primary bar:
//! 1. entry-order timeout bookkeeping
//! 2. circuit-breaker countdown
//! 3. feed the MAs (and ATR) and classify the crossover
//! 4. resolve the pending signal from the previous bar
//! 5. run a new crossover through the filter cascade, then pend or execute
//! 6. trailing stop
//! 7. remember the current MAs for the next bar
//!
//! DMI and Stochastic bar types only feed their indicators. A bar whose type
//! matches several configured streams feeds each of them. Void bars (any NaN
//! price) are skipped before routing.

pub mod config;
pub mod events;
pub mod rejected;

pub use crate::orders::LifecycleState;
pub use config::{ConfigError, StrategyConfig};
pub use events::{PositionClosed, StrategyEvent};
pub use rejected::{RejectedSignalRecord, RejectionAction};

use crate::domain::{Bar, BarType, Instrument};
use crate::engine::ExecutionEngine;
use crate::filters::{FilterBank, FilterContext};
use crate::indicators::{Adx, Atr, Dmi, Indicator, IndicatorError, Sma, Stochastic};
use crate::orders::{
    CircuitBreaker, LifecycleSettings, OrderLifecycle, PendingResolution, PendingSignal,
    SignalOutcome,
};
use crate::signals::{CrossoverDetector, SignalDirection, StochasticCrossTracker};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Tag carried by every bracket this strategy submits.
pub const ORDER_TAG: &str = "MA_CROSS";

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("instrument {0} not found")]
    InstrumentNotFound(String),

    #[error("strategy received a bar before on_start")]
    NotStarted,
}

/// Moving-average crossover strategy driving an execution engine.
#[derive(Debug)]
pub struct MaCrossStrategy<E: ExecutionEngine> {
    config: StrategyConfig,
    engine: E,
    fingerprint: String,
    instrument: Option<Instrument>,

    primary_bar_type: BarType,
    dmi_bar_type: BarType,
    stoch_bar_type: BarType,

    fast_sma: Sma,
    slow_sma: Sma,
    atr: Option<Atr>,
    dmi: Option<Dmi>,
    adx: Option<Adx>,
    stochastic: Option<Stochastic>,
    stoch_crosses: StochasticCrossTracker,
    crossover: CrossoverDetector,

    filters: FilterBank,
    lifecycle: OrderLifecycle,
    rejected: Vec<RejectedSignalRecord>,
}

impl<E: ExecutionEngine> MaCrossStrategy<E> {
    /// Validate the config and build every indicator up front.
    pub fn new(config: StrategyConfig, engine: E) -> Result<Self, StrategyError> {
        config.validate()?;
        let fingerprint = config.fingerprint()?;
        let short_fp = fingerprint.get(..8).unwrap_or(fingerprint.as_str());
        let tags = vec![ORDER_TAG.to_string(), format!("config={short_fp}")];

        let atr = config.atr_enabled.then(|| Atr::new(config.atr_period)).transpose()?;
        let (dmi, adx) = if config.needs_dmi() {
            (Some(Dmi::new(config.dmi_period)?), Some(Adx::new(config.dmi_period)?))
        } else {
            (None, None)
        };
        let stochastic = config
            .stoch_enabled
            .then(|| Stochastic::new(config.stoch_period_k, config.stoch_period_d))
            .transpose()?;

        Ok(Self {
            fingerprint,
            instrument: None,
            primary_bar_type: config.primary_bar_type(),
            dmi_bar_type: config.dmi_bar_type(),
            stoch_bar_type: config.stoch_bar_type(),
            fast_sma: Sma::new(config.fast_period)?,
            slow_sma: Sma::new(config.slow_period)?,
            atr,
            dmi,
            adx,
            stochastic,
            stoch_crosses: StochasticCrossTracker::new(),
            crossover: CrossoverDetector::new(),
            filters: FilterBank::from_config(&config),
            lifecycle: OrderLifecycle::new(LifecycleSettings::from_config(&config, tags)),
            rejected: Vec::new(),
            config,
            engine,
        })
    }

    // ── Event entry points ───────────────────────────────────────────

    pub fn handle(&mut self, event: StrategyEvent) -> Result<(), StrategyError> {
        match event {
            StrategyEvent::BarArrived(bar) => self.on_bar(&bar),
            StrategyEvent::PositionClosed(closed) => {
                self.on_position_closed(&closed);
                Ok(())
            }
        }
    }

    /// Resolve the instrument. Bars are refused until this succeeds.
    pub fn on_start(&mut self) -> Result<(), StrategyError> {
        let instrument = self
            .engine
            .instrument(&self.config.instrument_id)
            .ok_or_else(|| StrategyError::InstrumentNotFound(self.config.instrument_id.clone()))?;
        info!(
            instrument = %instrument.id,
            pip_value = instrument.pip_value(),
            bar_type = %self.primary_bar_type,
            fingerprint = %self.fingerprint,
            filters = ?self.filters.names(),
            "strategy started"
        );
        self.instrument = Some(instrument);
        Ok(())
    }

    pub fn on_bar(&mut self, bar: &Bar) -> Result<(), StrategyError> {
        let instrument = self.instrument.clone().ok_or(StrategyError::NotStarted)?;
        if bar.is_void() {
            warn!(bar_type = %bar.bar_type, ts = %bar.ts_event, "void bar skipped");
            return Ok(());
        }
        let mut routed = false;

        if bar.bar_type == self.dmi_bar_type {
            if let (Some(dmi), Some(adx)) = (self.dmi.as_mut(), self.adx.as_mut()) {
                dmi.handle_bar(bar);
                adx.update_from(dmi);
                routed = true;
            }
        }
        if bar.bar_type == self.stoch_bar_type {
            if let Some(stoch) = self.stochastic.as_mut() {
                stoch.handle_bar(bar);
                self.stoch_crosses.update_from(stoch);
                routed = true;
            }
        }
        if bar.bar_type == self.primary_bar_type {
            self.on_primary_bar(bar, &instrument);
            routed = true;
        }
        if !routed {
            debug!(bar_type = %bar.bar_type, "bar type not subscribed, ignored");
        }
        Ok(())
    }

    pub fn on_position_closed(&mut self, closed: &PositionClosed) {
        if closed.instrument_id != self.config.instrument_id {
            debug!(instrument = %closed.instrument_id, "position close for another instrument, ignored");
            return;
        }
        let tripped = self.lifecycle.on_position_closed(closed.realized_pnl);
        info!(
            realized_pnl = closed.realized_pnl,
            consecutive_losses = self.lifecycle.breaker().consecutive_losses(),
            breaker_tripped = tripped,
            "position closed"
        );
    }

    /// Cancel working entries and flatten the instrument.
    pub fn on_stop(&mut self) {
        self.lifecycle.stop(&mut self.engine);
        info!(rejected_signals = self.rejected.len(), "strategy stopped");
    }

    /// Clear all indicator, signal, order and audit state for a fresh run.
    pub fn on_reset(&mut self) {
        self.fast_sma.reset();
        self.slow_sma.reset();
        if let Some(atr) = self.atr.as_mut() {
            atr.reset();
        }
        if let Some(dmi) = self.dmi.as_mut() {
            dmi.reset();
        }
        if let Some(adx) = self.adx.as_mut() {
            adx.reset();
        }
        if let Some(stoch) = self.stochastic.as_mut() {
            stoch.reset();
        }
        self.stoch_crosses.reset();
        self.crossover.reset();
        self.lifecycle.reset();
        self.rejected.clear();
        debug!("strategy state reset");
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Copy of the audit log.
    pub fn get_rejected_signals(&self) -> Vec<RejectedSignalRecord> {
        self.rejected.clone()
    }

    pub fn state(&self) -> LifecycleState {
        let position = self.engine.open_position(&self.config.instrument_id);
        self.lifecycle.state(position.as_ref())
    }

    pub fn pending_signal(&self) -> Option<&PendingSignal> {
        self.lifecycle.pending()
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        self.lifecycle.breaker()
    }

    pub fn lifecycle(&self) -> &OrderLifecycle {
        &self.lifecycle
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn fast_ma(&self) -> Option<f64> {
        self.fast_sma.value()
    }

    pub fn slow_ma(&self) -> Option<f64> {
        self.slow_sma.value()
    }

    pub fn dmi(&self) -> Option<&Dmi> {
        self.dmi.as_ref()
    }

    pub fn adx(&self) -> Option<&Adx> {
        self.adx.as_ref()
    }

    pub fn stochastic(&self) -> Option<&Stochastic> {
        self.stochastic.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ── Primary bar pipeline ─────────────────────────────────────────

    fn on_primary_bar(&mut self, bar: &Bar, instrument: &Instrument) {
        self.lifecycle.begin_bar(&mut self.engine);

        self.fast_sma.handle_bar(bar);
        self.slow_sma.handle_bar(bar);
        if let Some(atr) = self.atr.as_mut() {
            atr.handle_bar(bar);
        }
        let fast = self.fast_sma.value();
        let slow = self.slow_sma.value();
        let crossover = self.crossover.detect(fast, slow);

        if let Some(resolution) =
            self.lifecycle.resolve_pending(crossover, bar, instrument, &mut self.engine)
        {
            self.record_resolution(bar, resolution, fast, slow);
        }

        if let (Some(direction), Some(fast), Some(slow)) = (crossover.direction(), fast, slow) {
            info!(%direction, fast_ma = fast, slow_ma = slow, ts = %bar.ts_event, "crossover detected");
            self.evaluate_signal(direction, bar, fast, slow, instrument);
        }

        self.lifecycle.update_trailing(bar, instrument, &mut self.engine);
        self.crossover.store(fast, slow);
    }

    fn evaluate_signal(
        &mut self,
        direction: SignalDirection,
        bar: &Bar,
        fast: f64,
        slow: f64,
        instrument: &Instrument,
    ) {
        let rejection = {
            let ctx = FilterContext {
                bar,
                fast_ma: fast,
                slow_ma: slow,
                pip_value: instrument.pip_value(),
                atr: self.atr.as_ref(),
                dmi: self.dmi.as_ref(),
                adx: self.adx.as_ref(),
                stochastic: self.stochastic.as_ref(),
                stoch_crosses: &self.stoch_crosses,
                circuit_breaker: self.lifecycle.breaker(),
            };
            self.filters.first_rejection(direction, &ctx)
        };

        if let Some(eval) = rejection {
            let reason = eval.verdict.reason().unwrap_or_default().to_string();
            self.record(bar, direction, RejectionAction::Rejected, reason, fast, slow);
            return;
        }

        match self.lifecycle.accept_signal(direction, bar, fast, slow, instrument, &mut self.engine) {
            SignalOutcome::Rejected { reason } => {
                self.record(bar, direction, RejectionAction::Rejected, reason, fast, slow);
            }
            SignalOutcome::CloseOnly => {
                self.record(bar, direction, RejectionAction::CloseOnly, "close_only".into(), fast, slow);
            }
            SignalOutcome::Pending | SignalOutcome::Submitted(_) | SignalOutcome::Failed => {}
        }
    }

    fn record_resolution(
        &mut self,
        bar: &Bar,
        resolution: PendingResolution,
        fast: Option<f64>,
        slow: Option<f64>,
    ) {
        match resolution {
            PendingResolution::Reversed { signal, by } => {
                let reason = format!("pending_signal_reversed_by_{}_crossover", by.crossover_name());
                let (f, s) = (fast.unwrap_or(signal.fast_ma), slow.unwrap_or(signal.slow_ma));
                self.record(bar, signal.direction, RejectionAction::Cancelled, reason, f, s);
            }
            PendingResolution::Rejected { signal, reason } => {
                self.record(bar, signal.direction, RejectionAction::Rejected, reason, signal.fast_ma, signal.slow_ma);
            }
            PendingResolution::CloseOnly { signal } => {
                self.record(
                    bar,
                    signal.direction,
                    RejectionAction::CloseOnly,
                    "close_only".into(),
                    signal.fast_ma,
                    signal.slow_ma,
                );
            }
            PendingResolution::Submitted { .. } => {}
            PendingResolution::Failed { signal } => {
                warn!(direction = %signal.direction, "pending signal dropped after engine failure");
            }
        }
    }

    fn record(
        &mut self,
        bar: &Bar,
        direction: SignalDirection,
        action: RejectionAction,
        reason: String,
        fast_ma: f64,
        slow_ma: f64,
    ) {
        info!(%direction, %action, %reason, ts = %bar.ts_event, "signal not executed");
        self.rejected.push(RejectedSignalRecord {
            timestamp: bar.ts_init,
            bar_close_time: bar.ts_event,
            signal_type: direction,
            action,
            reason,
            fast_ma,
            slow_ma,
        });
    }
}
