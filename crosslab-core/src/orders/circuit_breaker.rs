//! Consecutive-loss circuit breaker.
//!
//! Position closes with PnL <= 0 count as losses; a profitable close resets
//! the count. Reaching `max_consecutive_losses` starts a cooldown that blocks
//! exactly `cooldown_bars` primary bars. A cooldown of zero never activates.

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    enabled: bool,
    max_consecutive_losses: usize,
    cooldown_bars: usize,
    consecutive_losses: usize,
    active: bool,
    bars_remaining: usize,
}

impl CircuitBreaker {
    pub fn new(enabled: bool, max_consecutive_losses: usize, cooldown_bars: usize) -> Self {
        Self {
            enabled,
            max_consecutive_losses,
            cooldown_bars,
            consecutive_losses: 0,
            active: false,
            bars_remaining: 0,
        }
    }

    /// Record a closed position. Returns `true` when this close activated the
    /// cooldown.
    pub fn record_close(&mut self, realized_pnl: f64) -> bool {
        if !self.enabled {
            return false;
        }
        if realized_pnl > 0.0 {
            self.consecutive_losses = 0;
            return false;
        }

        self.consecutive_losses += 1;
        if self.active || self.consecutive_losses < self.max_consecutive_losses {
            return false;
        }
        if self.cooldown_bars == 0 {
            warn!(
                consecutive_losses = self.consecutive_losses,
                "loss limit reached but cooldown_bars is 0, breaker not activated"
            );
            return false;
        }
        self.active = true;
        self.bars_remaining = self.cooldown_bars;
        warn!(
            consecutive_losses = self.consecutive_losses,
            cooldown_bars = self.cooldown_bars,
            "circuit breaker activated"
        );
        true
    }

    /// Advance the cooldown by one primary bar.
    ///
    /// The bar after the last blocked bar deactivates the breaker and clears
    /// the loss counter before any signal on it is evaluated.
    pub fn on_bar(&mut self) {
        if !self.active {
            return;
        }
        if self.bars_remaining == 0 {
            self.active = false;
            self.consecutive_losses = 0;
            info!("circuit breaker cooldown finished");
        } else {
            self.bars_remaining -= 1;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn consecutive_losses(&self) -> usize {
        self.consecutive_losses
    }

    pub fn bars_remaining(&self) -> usize {
        self.bars_remaining
    }

    pub fn reset(&mut self) {
        self.consecutive_losses = 0;
        self.active = false;
        self.bars_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activates_after_max_losses() {
        let mut breaker = CircuitBreaker::new(true, 3, 10);
        assert!(!breaker.record_close(-5.0));
        assert!(!breaker.record_close(0.0));
        assert!(breaker.record_close(-1.0));
        assert!(breaker.is_active());
        assert_eq!(breaker.bars_remaining(), 10);
    }

    #[test]
    fn blocks_exactly_cooldown_bars() {
        let mut breaker = CircuitBreaker::new(true, 1, 3);
        breaker.record_close(-1.0);
        let mut blocked = 0;
        for _ in 0..10 {
            breaker.on_bar();
            if breaker.is_active() {
                blocked += 1;
            }
        }
        assert_eq!(blocked, 3);
        assert_eq!(breaker.consecutive_losses(), 0);
    }

    #[test]
    fn win_resets_counter() {
        let mut breaker = CircuitBreaker::new(true, 3, 10);
        breaker.record_close(-1.0);
        breaker.record_close(-1.0);
        breaker.record_close(2.5);
        assert_eq!(breaker.consecutive_losses(), 0);
        breaker.record_close(-1.0);
        assert!(!breaker.is_active());
    }

    #[test]
    fn zero_cooldown_never_activates() {
        let mut breaker = CircuitBreaker::new(true, 2, 0);
        breaker.record_close(-1.0);
        assert!(!breaker.record_close(-1.0));
        assert!(!breaker.is_active());
    }

    #[test]
    fn disabled_ignores_losses() {
        let mut breaker = CircuitBreaker::new(false, 1, 5);
        assert!(!breaker.record_close(-1.0));
        assert_eq!(breaker.consecutive_losses(), 0);
    }

    #[test]
    fn reset_clears_cooldown() {
        let mut breaker = CircuitBreaker::new(true, 1, 5);
        breaker.record_close(-1.0);
        breaker.reset();
        assert!(!breaker.is_active());
        assert_eq!(breaker.bars_remaining(), 0);
    }
}
