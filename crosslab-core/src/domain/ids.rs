use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-assigned order ID (`O-{sequence}-{leg}`).
///
/// The strategy generates ids itself so every command sent to the engine can be
/// correlated with later status queries without waiting for an acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientOrderId(pub String);

impl ClientOrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic generator for client order ids.
#[derive(Debug, Clone, Default)]
pub struct OrderIdGenerator {
    next: u64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new sequence number and return the id for the given leg.
    pub fn next_sequence(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    pub fn leg(sequence: u64, leg: &str) -> ClientOrderId {
        ClientOrderId(format!("O-{sequence}-{leg}"))
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
