//! End-to-end scenarios: bars in, engine commands and audit records out.
//!
//! Every scenario drives `MaCrossStrategy` through `RecordingEngine`, so the
//! assertions see exactly what a live engine would have been asked to do.

use chrono::{Duration, TimeZone, Utc};
use crosslab_core::domain::{Bar, BarType, EntryKind, Instrument, OrderSide};
use crosslab_core::signals::SignalDirection;
use crosslab_core::strategy::{LifecycleState, PositionClosed, RejectionAction, StrategyEvent};
use crosslab_core::{MaCrossStrategy, RecordingEngine, StrategyConfig};

const EURUSD: &str = "EUR/USD.SIM";
const SPEC: &str = "15-MINUTE-MID-EXTERNAL";

// ── Helpers ──────────────────────────────────────────────────────────

/// Primary bars from closes. Open is the previous close; 2-pip wicks.
fn bars(closes: &[f64]) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let ts = base + Duration::minutes(15 * i as i64);
            Bar {
                bar_type: BarType::new(EURUSD, SPEC),
                open,
                high: open.max(close) + 0.0002,
                low: open.min(close) - 0.0002,
                close,
                volume: 1000.0,
                ts_event: ts,
                ts_init: ts,
            }
        })
        .collect()
}

fn series(parts: &[(f64, usize)]) -> Vec<f64> {
    parts.iter().flat_map(|&(price, n)| std::iter::repeat(price).take(n)).collect()
}

fn strategy(config: StrategyConfig) -> MaCrossStrategy<RecordingEngine> {
    let engine = RecordingEngine::new().with_instrument(Instrument::fx_major(EURUSD));
    let mut strategy = MaCrossStrategy::new(config, engine).unwrap();
    strategy.on_start().unwrap();
    strategy
}

fn short_periods() -> StrategyConfig {
    StrategyConfig { fast_period: 2, slow_period: 4, ..StrategyConfig::default() }
}

fn losing_close(ts_bar: &Bar) -> StrategyEvent {
    StrategyEvent::PositionClosed(PositionClosed {
        instrument_id: EURUSD.into(),
        realized_pnl: -120.0,
        ts_closed: ts_bar.ts_event,
    })
}

// ──────────────────────────────────────────────
// Scenario 1: flat MAs, single jump
// ──────────────────────────────────────────────

#[test]
fn flat_series_then_jump_yields_one_bullish_signal() {
    let mut strategy = strategy(StrategyConfig::default());
    let bars = bars(&series(&[(1.0800, 20), (1.0850, 31)]));

    for bar in &bars[..20] {
        strategy.on_bar(bar).unwrap();
    }
    assert_eq!(strategy.fast_ma(), Some(1.08));
    assert_eq!(strategy.slow_ma(), Some(1.08));
    assert!(strategy.pending_signal().is_none());

    // Jump bar: the crossover is confirmed and pends until the next bar.
    strategy.on_bar(&bars[20]).unwrap();
    let pending = strategy.pending_signal().expect("BUY should be pending");
    assert_eq!(pending.direction, SignalDirection::Buy);
    assert_eq!(pending.bar_ts, bars[20].ts_event);

    for bar in &bars[21..] {
        strategy.on_bar(bar).unwrap();
    }

    let brackets = strategy.engine().brackets();
    assert_eq!(brackets.len(), 1, "exactly one entry for exactly one crossover");
    let entry = &brackets[0].entry;
    assert_eq!(entry.side, OrderSide::Buy);
    // Limit at the open of the bar after the crossover.
    assert_eq!(entry.kind, EntryKind::Limit { price: 1.085 });
    assert!(strategy.get_rejected_signals().is_empty());
}

// ──────────────────────────────────────────────
// Scenario 2: reversal while pending
// ──────────────────────────────────────────────

#[test]
fn opposite_crossover_cancels_pending_buy() {
    let mut strategy = strategy(short_periods());
    let bars = bars(&series(&[(1.0800, 49), (1.0850, 1), (1.0700, 1)]));

    for bar in &bars[..50] {
        strategy.on_bar(bar).unwrap();
    }
    assert_eq!(strategy.lifecycle().bar_count(), 50);
    assert_eq!(strategy.pending_signal().unwrap().direction, SignalDirection::Buy);

    strategy.on_bar(&bars[50]).unwrap();

    let rejected = strategy.get_rejected_signals();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].signal_type, SignalDirection::Buy);
    assert_eq!(rejected[0].action, RejectionAction::Cancelled);
    assert_eq!(rejected[0].reason, "pending_signal_reversed_by_bearish_crossover");
    assert_eq!(rejected[0].bar_close_time, bars[50].ts_event);

    assert_eq!(strategy.pending_signal().unwrap().direction, SignalDirection::Sell);
    assert_eq!(strategy.state(), LifecycleState::PendingSignal);
    assert!(strategy.engine().brackets().is_empty(), "no BUY order is ever submitted");
}

// ──────────────────────────────────────────────
// Scenario 3: crossover magnitude below threshold
// ──────────────────────────────────────────────

#[test]
fn half_pip_separation_rejected_by_one_pip_threshold() {
    let config = StrategyConfig { crossover_threshold_pips: 1.0, ..short_periods() };
    let mut strategy = strategy(config);

    for bar in &bars(&series(&[(1.0800, 6), (1.0802, 10)])) {
        strategy.on_bar(bar).unwrap();
    }

    assert!(strategy.engine().brackets().is_empty());
    assert!(strategy.pending_signal().is_none());
    let rejected = strategy.get_rejected_signals();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].action, RejectionAction::Rejected);
    assert!(rejected[0].reason.contains("crossover_threshold_not_met"), "{}", rejected[0].reason);
    assert!(rejected[0].fast_ma > rejected[0].slow_ma);
}

// ──────────────────────────────────────────────
// Scenario 4: circuit breaker cooldown
// ──────────────────────────────────────────────

#[test]
fn breaker_blocks_signals_until_cooldown_elapses() {
    let config = StrategyConfig {
        circuit_breaker_enabled: true,
        max_consecutive_losses: 3,
        cooldown_bars: 10,
        use_limit_orders: false,
        ..short_periods()
    };
    let mut strategy = strategy(config);
    // Bullish crossovers at bar 5 and bar 16.
    let bars = bars(&series(&[(1.0800, 4), (1.0850, 11), (1.0900, 3)]));

    for bar in &bars[..4] {
        strategy.on_bar(bar).unwrap();
    }
    for _ in 0..3 {
        strategy.handle(losing_close(&bars[3])).unwrap();
    }
    assert!(strategy.circuit_breaker().is_active());
    assert_eq!(strategy.circuit_breaker().consecutive_losses(), 3);

    // Bar 5: first cooldown bar, valid crossover rejected.
    strategy.handle(StrategyEvent::BarArrived(bars[4].clone())).unwrap();
    let rejected = strategy.get_rejected_signals();
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].reason.contains("circuit_breaker_active"), "{}", rejected[0].reason);
    assert!(strategy.engine().brackets().is_empty());

    // Bars 6..=14 finish the ten-bar cooldown, bar 15 clears the breaker.
    for bar in &bars[5..14] {
        strategy.on_bar(bar).unwrap();
    }
    assert!(strategy.circuit_breaker().is_active());
    strategy.on_bar(&bars[14]).unwrap();
    assert!(!strategy.circuit_breaker().is_active());
    assert_eq!(strategy.circuit_breaker().consecutive_losses(), 0);

    // Bar 16: the next crossover goes straight to a market bracket.
    strategy.on_bar(&bars[15]).unwrap();
    let brackets = strategy.engine().brackets();
    assert_eq!(brackets.len(), 1);
    assert_eq!(brackets[0].entry.side, OrderSide::Buy);
    assert_eq!(brackets[0].entry.kind, EntryKind::Market);
    assert_eq!(strategy.get_rejected_signals().len(), 1);
}
