//! Order lifecycle: bracket construction, pending signals, entry timeouts,
//! trailing stops, position limits and the loss circuit breaker.
//!
//! `OrderLifecycle` owns the per-run order state and issues every engine
//! command. The other types are plain state machines it composes.

pub mod bracket;
pub mod circuit_breaker;
pub mod entry_tracker;
pub mod lifecycle;
pub mod pending;
pub mod position_limit;
pub mod ratchet;
pub mod trailing;

pub use bracket::BracketOrderBuilder;
pub use circuit_breaker::CircuitBreaker;
pub use entry_tracker::{EntryOrderTracker, TrackedEntry};
pub use lifecycle::{
    LifecycleSettings, LifecycleState, OrderLifecycle, PendingResolution, SignalOutcome,
};
pub use pending::PendingSignal;
pub use position_limit::{PositionDecision, PositionLimit};
pub use ratchet::StopRatchet;
pub use trailing::{TrailingStop, TrailingUpdate};
