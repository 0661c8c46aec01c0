//! Filter operator - pass/drop decision without modifying the payload

use tracing::debug;

use contracts::{FlowError, OperatorConfig, Packet, Predicate};

use crate::metrics::OperatorMetricsSnapshot;
use crate::operator::{Operator, OperatorCore};
use crate::routing::RoutingTable;

/// Operator that forwards packets whose value satisfies the predicate and
/// drops the rest. The payload is never modified.
///
/// A predicate fault is fatal to the current packet and propagates out of
/// `receive` uncaught; the packet is counted as neither passed nor
/// filtered.
pub struct FilterOperator {
    core: OperatorCore,
    predicate: Box<dyn Predicate>,
    stats: FilterStats,
}

impl FilterOperator {
    /// Build the operator from validated configuration.
    pub fn new(
        config: OperatorConfig,
        predicate: Box<dyn Predicate>,
        routes: RoutingTable,
    ) -> Result<Self, FlowError> {
        Ok(Self {
            core: OperatorCore::new(config, routes)?,
            predicate,
            stats: FilterStats::default(),
        })
    }

    /// Pass/drop counters for this instance.
    pub fn filter_stats(&self) -> FilterStats {
        self.stats
    }

    /// Snapshot of this instance's counters.
    pub fn metrics(&self) -> OperatorMetricsSnapshot {
        self.core.metrics()
    }
}

impl Operator for FilterOperator {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn receive(&mut self, packet: Packet) -> Result<(), FlowError> {
        let _guard = self.core.span().enter();
        debug!(value = ?packet.value(), "packet received");
        self.core.note_packet();

        let passes = match self.predicate.test(packet.value()) {
            Ok(passes) => passes,
            Err(e) => {
                self.core.note_fault("test", &e);
                return Err(e);
            }
        };

        self.stats.total_input += 1;
        if passes {
            self.stats.passed += 1;
            debug!("packet passed");
            if let Err(e) = self.core.emit(packet.into_value(), None) {
                self.core.note_fault("emit", &e);
                return Err(e);
            }
        } else {
            self.stats.filtered += 1;
            debug!("packet filtered out");
        }

        Ok(())
    }
}

/// Pass/drop counters for a filter operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Total packets that reached the predicate and got a verdict
    pub total_input: u64,
    /// Packets forwarded downstream
    pub passed: u64,
    /// Packets dropped
    pub filtered: u64,
}

impl FilterStats {
    /// Percentage of inputs that passed; 0.0 when nothing was seen yet.
    pub fn pass_rate_percent(&self) -> f64 {
        if self.total_input == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total_input as f64 * 100.0
    }
}
