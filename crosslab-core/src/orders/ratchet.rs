/// Stop ratchet
///
/// **Core Rule:** a protective stop may tighten, never loosen.
///
/// - Long positions: the stop can only rise
/// - Short positions: the stop can only fall
///
/// A flat side never tightens; there is nothing to protect.
use crate::domain::{OrderSide, PositionSide};

#[derive(Debug, Clone, PartialEq)]
pub struct StopRatchet {
    /// Current stop level (high-water mark for longs, low-water mark for shorts)
    current_level: f64,
    side: PositionSide,
}

impl StopRatchet {
    pub fn with_initial_level(side: PositionSide, initial_level: f64) -> Self {
        Self { current_level: initial_level, side }
    }

    /// Ratchet guarding the position an entry order of `side` opens.
    pub fn for_entry(side: OrderSide, initial_level: f64) -> Self {
        let side = match side {
            OrderSide::Buy => PositionSide::Long,
            OrderSide::Sell => PositionSide::Short,
        };
        Self::with_initial_level(side, initial_level)
    }

    pub fn side(&self) -> PositionSide {
        self.side
    }

    /// Whether `proposed` is strictly more favorable than the current level.
    pub fn is_tighter(&self, proposed: f64) -> bool {
        match self.side {
            PositionSide::Flat => false,
            PositionSide::Long => proposed > self.current_level,
            PositionSide::Short => proposed < self.current_level,
        }
    }

    /// Apply ratchet to a proposed stop level
    ///
    /// Returns the ratcheted level (can only tighten, never loosen).
    ///
    /// # Example
    /// ```
    /// use crosslab_core::domain::PositionSide;
    /// use crosslab_core::orders::StopRatchet;
    ///
    /// let mut ratchet = StopRatchet::with_initial_level(PositionSide::Long, 1.0750);
    ///
    /// // Tightening: 1.0750 -> 1.0780 (allowed)
    /// assert_eq!(ratchet.apply(1.0780), 1.0780);
    ///
    /// // Loosening: 1.0780 -> 1.0760 (blocked)
    /// assert_eq!(ratchet.apply(1.0760), 1.0780);
    /// ```
    pub fn apply(&mut self, proposed: f64) -> f64 {
        self.current_level = match self.side {
            PositionSide::Long => self.current_level.max(proposed),
            PositionSide::Short => self.current_level.min(proposed),
            PositionSide::Flat => self.current_level,
        };
        self.current_level
    }

    pub fn current_level(&self) -> f64 {
        self.current_level
    }
}
