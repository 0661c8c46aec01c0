//! Per-operator metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single operator instance
#[derive(Debug, Default)]
pub struct OperatorMetrics {
    /// Total packets accepted by `receive`
    packets_received: AtomicU64,
    /// Total items routed downstream
    items_emitted: AtomicU64,
    /// Total faults propagated out of `receive`
    faults: AtomicU64,
    /// Total items dropped on a channel with no downstream
    routing_misses: AtomicU64,
}

impl OperatorMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get packets received count
    pub fn packets_received(&self) -> u64 {
        self.packets_received.load(Ordering::Relaxed)
    }

    /// Increment packets received count
    pub fn inc_packets_received(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Get items emitted count
    pub fn items_emitted(&self) -> u64 {
        self.items_emitted.load(Ordering::Relaxed)
    }

    /// Increment items emitted count
    pub fn inc_items_emitted(&self) {
        self.items_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get fault count
    pub fn faults(&self) -> u64 {
        self.faults.load(Ordering::Relaxed)
    }

    /// Increment fault count
    pub fn inc_faults(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Get routing miss count
    pub fn routing_misses(&self) -> u64 {
        self.routing_misses.load(Ordering::Relaxed)
    }

    /// Increment routing miss count
    pub fn inc_routing_misses(&self) {
        self.routing_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> OperatorMetricsSnapshot {
        OperatorMetricsSnapshot {
            packets_received: self.packets_received(),
            items_emitted: self.items_emitted(),
            faults: self.faults(),
            routing_misses: self.routing_misses(),
        }
    }
}

/// Snapshot of operator metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorMetricsSnapshot {
    pub packets_received: u64,
    pub items_emitted: u64,
    pub faults: u64,
    pub routing_misses: u64,
}
