//! Strategy configuration.
//!
//! Every recognized option with its default. Loaded from TOML, validated
//! eagerly, and fingerprinted with blake3 over its canonical JSON so orders
//! can be traced back to the exact parameter set that produced them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::domain::BarType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    // ── Instrument and timeframe ──
    pub instrument_id: String,
    pub bar_spec: String,

    // ── Moving averages and sizing ──
    pub fast_period: usize,
    pub slow_period: usize,
    pub trade_size: f64,

    // ── Position limits ──
    pub enforce_position_limit: bool,
    pub allow_position_reversal: bool,

    // ── Exits (pips) ──
    pub stop_loss_pips: f64,
    pub take_profit_pips: f64,
    pub trailing_stop_activation_pips: f64,
    pub trailing_stop_distance_pips: f64,

    // ── Crossover threshold ──
    pub crossover_threshold_pips: f64,

    // ── ATR filter ──
    pub atr_enabled: bool,
    pub atr_period: usize,
    pub atr_min_strength: f64,
    pub atr_max_strength: f64,

    // ── Time filter ──
    pub time_filter_enabled: bool,
    pub trading_hours_start: u32,
    pub trading_hours_end: u32,
    pub trading_hours_timezone: String,
    pub excluded_hours: Vec<u32>,

    // ── ADX / DMI ──
    pub adx_enabled: bool,
    pub adx_min_threshold: f64,
    pub dmi_enabled: bool,
    pub dmi_bar_spec: String,
    pub dmi_period: usize,

    // ── Stochastic ──
    pub stoch_enabled: bool,
    pub stoch_bar_spec: String,
    pub stoch_period_k: usize,
    pub stoch_period_d: usize,
    pub stoch_bullish_threshold: f64,
    pub stoch_bearish_threshold: f64,
    pub stoch_max_bars_since_crossing: usize,

    // ── Circuit breaker ──
    pub circuit_breaker_enabled: bool,
    pub max_consecutive_losses: usize,
    pub cooldown_bars: usize,

    // ── Order type ──
    pub use_limit_orders: bool,
    pub limit_order_timeout_bars: u64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            instrument_id: "EUR/USD.SIM".into(),
            bar_spec: "15-MINUTE-MID-EXTERNAL".into(),
            fast_period: 10,
            slow_period: 20,
            trade_size: 100_000.0,
            enforce_position_limit: true,
            allow_position_reversal: false,
            stop_loss_pips: 25.0,
            take_profit_pips: 50.0,
            trailing_stop_activation_pips: 20.0,
            trailing_stop_distance_pips: 15.0,
            crossover_threshold_pips: 0.7,
            atr_enabled: false,
            atr_period: 14,
            atr_min_strength: 0.0,
            atr_max_strength: 0.0,
            time_filter_enabled: false,
            trading_hours_start: 0,
            trading_hours_end: 24,
            trading_hours_timezone: "America/New_York".into(),
            excluded_hours: Vec::new(),
            adx_enabled: false,
            adx_min_threshold: 25.0,
            dmi_enabled: false,
            dmi_bar_spec: "2-MINUTE-MID-EXTERNAL".into(),
            dmi_period: 14,
            stoch_enabled: false,
            stoch_bar_spec: "15-MINUTE-MID-EXTERNAL".into(),
            stoch_period_k: 14,
            stoch_period_d: 3,
            stoch_bullish_threshold: 30.0,
            stoch_bearish_threshold: 70.0,
            stoch_max_bars_since_crossing: 9,
            circuit_breaker_enabled: false,
            max_consecutive_losses: 3,
            cooldown_bars: 10,
            use_limit_orders: true,
            limit_order_timeout_bars: 1,
        }
    }
}

impl StrategyConfig {
    /// Load a config from a TOML file. Missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject invalid parameter combinations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.instrument_id.trim().is_empty() {
            return invalid("instrument_id must not be empty".into());
        }
        if self.bar_spec.trim().is_empty() {
            return invalid("bar_spec must not be empty".into());
        }
        for (name, period) in [
            ("fast_period", self.fast_period),
            ("slow_period", self.slow_period),
            ("atr_period", self.atr_period),
            ("dmi_period", self.dmi_period),
            ("stoch_period_k", self.stoch_period_k),
            ("stoch_period_d", self.stoch_period_d),
        ] {
            if period == 0 {
                return invalid(format!("{name} must be > 0"));
            }
        }
        if self.fast_period >= self.slow_period {
            return invalid(format!(
                "fast_period ({}) must be less than slow_period ({})",
                self.fast_period, self.slow_period
            ));
        }
        if self.trade_size.is_nan() || self.trade_size <= 0.0 {
            return invalid(format!("trade_size must be > 0, got {}", self.trade_size));
        }
        for (name, pips) in [
            ("stop_loss_pips", self.stop_loss_pips),
            ("take_profit_pips", self.take_profit_pips),
            ("trailing_stop_activation_pips", self.trailing_stop_activation_pips),
            ("trailing_stop_distance_pips", self.trailing_stop_distance_pips),
            ("crossover_threshold_pips", self.crossover_threshold_pips),
            ("atr_min_strength", self.atr_min_strength),
            ("atr_max_strength", self.atr_max_strength),
            ("adx_min_threshold", self.adx_min_threshold),
        ] {
            if pips.is_nan() || pips < 0.0 {
                return invalid(format!("{name} must be >= 0, got {pips}"));
            }
        }
        for (name, level) in [
            ("stoch_bullish_threshold", self.stoch_bullish_threshold),
            ("stoch_bearish_threshold", self.stoch_bearish_threshold),
        ] {
            if !(0.0..=100.0).contains(&level) {
                return invalid(format!("{name} must be within 0-100, got {level}"));
            }
        }
        if self.use_limit_orders && self.limit_order_timeout_bars == 0 {
            return invalid("limit_order_timeout_bars must be > 0 when use_limit_orders is set".into());
        }
        if self.circuit_breaker_enabled && self.max_consecutive_losses == 0 {
            return invalid("max_consecutive_losses must be > 0 when the circuit breaker is enabled".into());
        }
        Ok(())
    }

    /// Deterministic blake3 hash of the canonical JSON form (hex).
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    pub fn primary_bar_type(&self) -> BarType {
        BarType::new(&self.instrument_id, &self.bar_spec)
    }

    pub fn dmi_bar_type(&self) -> BarType {
        BarType::new(&self.instrument_id, &self.dmi_bar_spec)
    }

    pub fn stoch_bar_type(&self) -> BarType {
        BarType::new(&self.instrument_id, &self.stoch_bar_spec)
    }

    /// DMI (and its ADX) are needed by either trend filter.
    pub fn needs_dmi(&self) -> bool {
        self.dmi_enabled || self.adx_enabled
    }
}
