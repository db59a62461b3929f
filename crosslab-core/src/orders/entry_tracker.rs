//! Bookkeeping for outstanding limit entry orders.
//!
//! Each tracked entry remembers the primary bar it was submitted on. Entries
//! the engine reports as terminal (or no longer knows) are pruned; limit
//! entries still working after `timeout_bars` bars are due for cancellation.
//! Market entries are tracked for state reporting but never time out.

use crate::domain::ClientOrderId;
use crate::engine::ExecutionEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    pub order_id: ClientOrderId,
    pub submitted_bar: u64,
    pub is_limit: bool,
}

#[derive(Debug, Clone)]
pub struct EntryOrderTracker {
    timeout_bars: u64,
    entries: Vec<TrackedEntry>,
}

impl EntryOrderTracker {
    pub fn new(timeout_bars: u64) -> Self {
        Self { timeout_bars, entries: Vec::new() }
    }

    pub fn track(&mut self, order_id: ClientOrderId, submitted_bar: u64, is_limit: bool) {
        self.entries.push(TrackedEntry { order_id, submitted_bar, is_limit });
    }

    /// Drop entries that are filled, cancelled, expired, rejected or unknown.
    /// Returns how many were removed.
    pub fn prune<E: ExecutionEngine + ?Sized>(&mut self, engine: &E) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| {
            engine
                .order_status(&e.order_id)
                .is_some_and(|status| !status.is_terminal())
        });
        before - self.entries.len()
    }

    /// Limit entries that have been working for at least `timeout_bars` bars.
    pub fn expired(&self, current_bar: u64) -> Vec<ClientOrderId> {
        self.entries
            .iter()
            .filter(|e| e.is_limit && current_bar.saturating_sub(e.submitted_bar) >= self.timeout_bars)
            .map(|e| e.order_id.clone())
            .collect()
    }

    pub fn remove(&mut self, order_id: &ClientOrderId) {
        self.entries.retain(|e| &e.order_id != order_id);
    }

    pub fn order_ids(&self) -> Vec<ClientOrderId> {
        self.entries.iter().map(|e| e.order_id.clone()).collect()
    }

    pub fn entries(&self) -> &[TrackedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
