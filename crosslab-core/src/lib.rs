//! CrossLab Core: moving-average crossover strategy for FX bars.
//!
//! This crate contains:
//! - Domain types (bars, instruments, positions, bracket orders)
//! - Streaming indicators (SMA, ATR, DMI, ADX, Stochastic)
//! - Crossover detection and the Stochastic crossing tracker
//! - The seven-stage signal filter cascade
//! - Order lifecycle: pending signals, brackets, trailing stop, circuit breaker
//! - The strategy orchestrator, driven through the `ExecutionEngine` trait

pub mod clock;
pub mod domain;
pub mod engine;
pub mod filters;
pub mod indicators;
pub mod orders;
pub mod signals;
pub mod strategy;

pub use engine::{ExecutionEngine, RecordingEngine};
pub use strategy::{MaCrossStrategy, StrategyConfig, StrategyError};
