//! Position-limit decisions for an accepted signal.
//!
//! NETTING: one net position per instrument. The decision depends only on the
//! signal direction, the open position (if any) and two flags.

use crate::domain::{Position, PositionSide};
use crate::signals::SignalDirection;

/// What to do with an accepted signal given the open position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionDecision {
    /// Flat, or the limit is not enforced: submit the entry.
    Open,
    /// Same-side position is open but reversal is allowed: submit the entry.
    ReversalAllowed,
    /// Opposite position with reversal allowed: close it, then submit the entry.
    Reverse,
    /// Opposite position without reversal: close it and stop there.
    CloseOnly,
    /// Same-side position already open.
    Rejected { reason: String },
}

impl PositionDecision {
    /// Whether an entry order should be submitted.
    pub fn submits_entry(&self) -> bool {
        matches!(self, Self::Open | Self::ReversalAllowed | Self::Reverse)
    }

    /// Whether the open position must be closed first.
    pub fn closes_position(&self) -> bool {
        matches!(self, Self::Reverse | Self::CloseOnly)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::ReversalAllowed => "reversal_allowed",
            Self::Reverse => "reverse",
            Self::CloseOnly => "close_only",
            Self::Rejected { .. } => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PositionLimit {
    enforce: bool,
    allow_reversal: bool,
}

impl PositionLimit {
    pub fn new(enforce: bool, allow_reversal: bool) -> Self {
        Self { enforce, allow_reversal }
    }

    pub fn check(&self, direction: SignalDirection, position: Option<&Position>) -> PositionDecision {
        if !self.enforce {
            return PositionDecision::Open;
        }
        let side = position.map_or(PositionSide::Flat, Position::side);
        let same_side = match (direction, side) {
            (_, PositionSide::Flat) => return PositionDecision::Open,
            (SignalDirection::Buy, PositionSide::Long) | (SignalDirection::Sell, PositionSide::Short) => true,
            _ => false,
        };

        match (same_side, self.allow_reversal) {
            (true, true) => PositionDecision::ReversalAllowed,
            (true, false) => PositionDecision::Rejected {
                reason: format!(
                    "position_limit_{}_already_open",
                    if side == PositionSide::Long { "long" } else { "short" }
                ),
            },
            (false, true) => PositionDecision::Reverse,
            (false, false) => PositionDecision::CloseOnly,
        }
    }
}
