//! Reordering of completed operations into design order.
//!
//! Agents report an operation when it completes, but the scoreboard must see
//! operations in the order the design sampled them. An operation sampled
//! earlier can complete later (a buffered read, or a slower clock domain),
//! so completions wait here until no agent still holds an older one.

use rtlcheck_sim::Capture;
use std::collections::BTreeMap;

/// Completed operations keyed by sampling edge.
#[derive(Debug, Default)]
pub struct OrderedQueue {
    pending: BTreeMap<(u64, u64), Capture>,
    arrivals: u64,
}

impl OrderedQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a completed operation.
    pub fn push(&mut self, capture: Capture) {
        self.pending
            .insert((capture.sampled_at, self.arrivals), capture);
        self.arrivals += 1;
    }

    /// Removes and returns, in sampling order, every operation sampled
    /// before `horizon`. With no horizon everything is released.
    pub fn release(&mut self, horizon: Option<u64>) -> Vec<Capture> {
        let kept = match horizon {
            Some(edge) => self.pending.split_off(&(edge, 0)),
            None => BTreeMap::new(),
        };
        std::mem::replace(&mut self.pending, kept)
            .into_values()
            .collect()
    }

    /// Number of operations waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops everything waiting.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
