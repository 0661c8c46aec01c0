//! Map operator - one input item, zero-or-one output item

use tracing::debug;

use contracts::{FlowError, OperatorConfig, Packet, Transform};

use crate::metrics::OperatorMetricsSnapshot;
use crate::operator::{Operator, OperatorCore};
use crate::routing::RoutingTable;

/// Operator that forwards the delegate's returned value as a single item
/// on the default channel. `Ok(None)` emits nothing; no sequence expansion
/// happens here (that is [`crate::FlatMapOperator`]'s job).
pub struct MapOperator {
    core: OperatorCore,
    transform: Box<dyn Transform>,
}

impl MapOperator {
    /// Build the operator from validated configuration.
    pub fn new(
        config: OperatorConfig,
        transform: Box<dyn Transform>,
        routes: RoutingTable,
    ) -> Result<Self, FlowError> {
        Ok(Self {
            core: OperatorCore::new(config, routes)?,
            transform,
        })
    }

    /// Snapshot of this instance's counters.
    pub fn metrics(&self) -> OperatorMetricsSnapshot {
        self.core.metrics()
    }
}

impl Operator for MapOperator {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn receive(&mut self, packet: Packet) -> Result<(), FlowError> {
        let _guard = self.core.span().enter();
        debug!(value = ?packet.value(), "packet received");
        self.core.note_packet();

        let result = match self.transform.execute(packet.into_value()) {
            Ok(result) => result,
            Err(e) => {
                self.core.note_fault("execute", &e);
                return Err(e);
            }
        };

        if let Some(output) = result {
            if let Err(e) = self.core.emit(output, None) {
                self.core.note_fault("emit", &e);
                return Err(e);
            }
        }

        debug!("packet processed");
        Ok(())
    }
}
