//! FlatMap operator - one input item, zero-or-many tagged outputs
//!
//! Reconciles the two emission idioms a delegate may use:
//!
//! 1. Returning a value from `execute` (a `Value::Seq` is expanded
//!    element-by-element, anything else is a single atomic item)
//! 2. Pushing items into the injected collector during the call
//!
//! Both channels may carry data in the same invocation; return-channel
//! items are always emitted strictly before collector-channel items.

use tracing::debug;

use contracts::{
    Collector, CollectorStats, FlowError, OperatorConfig, Packet, SharedCollector, Tag, Transform,
    Value,
};

use crate::metrics::OperatorMetricsSnapshot;
use crate::operator::{Operator, OperatorCore};
use crate::routing::RoutingTable;

/// Operator that expands one packet into zero-or-more tagged emissions.
///
/// Stateless across packets except for its routing table and collector;
/// per-packet processing is the state machine documented on
/// [`receive`](Operator::receive).
pub struct FlatMapOperator {
    core: OperatorCore,
    transform: Box<dyn Transform>,
    collector: Option<SharedCollector>,
}

impl FlatMapOperator {
    /// Build the operator, allocating and injecting a collector only when
    /// the delegate declares the collecting capability.
    pub fn new(
        config: OperatorConfig,
        mut transform: Box<dyn Transform>,
        routes: RoutingTable,
    ) -> Result<Self, FlowError> {
        let core = OperatorCore::new(config, routes)?;

        let collector = if transform.uses_collector() {
            let collector =
                Collector::shared_with_session(core.session_dir().map(|p| p.to_path_buf()));
            transform.insert_collector(collector.clone());
            debug!(operator = %core.name(), "collector attached");
            Some(collector)
        } else {
            None
        };

        Ok(Self {
            core,
            transform,
            collector,
        })
    }

    /// Collector counters; the zero struct when the delegate does not use
    /// the collecting idiom (that is not an error condition).
    pub fn collector_stats(&self) -> CollectorStats {
        self.collector
            .as_ref()
            .map(|c| c.lock().unwrap().stats())
            .unwrap_or_default()
    }

    /// Diagnostic dump of the currently buffered (pre-drain) collector
    /// contents; empty when no collector is attached.
    pub fn buffered(&self) -> Vec<(Value, Option<Tag>)> {
        self.collector
            .as_ref()
            .map(|c| c.lock().unwrap().buffered())
            .unwrap_or_default()
    }

    /// Snapshot of this instance's counters.
    pub fn metrics(&self) -> OperatorMetricsSnapshot {
        self.core.metrics()
    }

    /// Emit the return-channel output: a `Seq` expands in iteration order
    /// on the default channel, everything else is one atomic item. Text and
    /// bytes payloads are deliberately never expanded element-by-element.
    fn emit_returned(&self, output: Value) -> Result<(), FlowError> {
        match output {
            Value::Seq(items) => {
                let count = items.len();
                for item in items {
                    if let Err(e) = self.core.emit(item, None) {
                        self.core.note_fault("expand", &e);
                        return Err(e);
                    }
                }
                debug!(items = count, "expanded returned sequence");
            }
            atomic => {
                if let Err(e) = self.core.emit(atomic, None) {
                    self.core.note_fault("expand", &e);
                    return Err(e);
                }
                debug!("emitted single returned item");
            }
        }
        Ok(())
    }

    /// Drain the collector channel and emit each pair in collection order.
    fn emit_collected(&self) -> Result<(), FlowError> {
        let Some(collector) = &self.collector else {
            return Ok(());
        };

        // Lock released before any downstream receive runs
        let drained = collector.lock().unwrap().drain();
        if !drained.is_empty() {
            debug!(items = drained.len(), "draining collector channel");
        }

        for (value, tag) in drained {
            if let Err(e) = self.core.emit(value, tag) {
                self.core.note_fault("drain", &e);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Operator for FlatMapOperator {
    fn name(&self) -> &str {
        self.core.name()
    }

    /// Per-packet state machine:
    ///
    /// 1. Defensively clear the collector (guards against residue left by
    ///    a faulted prior invocation)
    /// 2. Invoke the delegate
    /// 3. Reconcile the return channel
    /// 4. Reconcile the collector channel
    ///
    /// A fault at any step is logged with operator name and phase, then
    /// propagated verbatim; items already emitted stay emitted.
    fn receive(&mut self, packet: Packet) -> Result<(), FlowError> {
        let _guard = self.core.span().enter();
        debug!(value = ?packet.value(), "packet received");
        self.core.note_packet();

        if let Some(collector) = &self.collector {
            collector.lock().unwrap().clear();
        }

        let result = match self.transform.execute(packet.into_value()) {
            Ok(result) => result,
            Err(e) => {
                self.core.note_fault("execute", &e);
                // Items collected before the fault still go out; they were
                // produced before the failure point and are not retracted
                // (at-least-once). The delegate's fault is the one that
                // propagates; a secondary drain fault only gets logged.
                if let Err(drain_err) = self.emit_collected() {
                    debug!(error = %drain_err, "drain after delegate fault also failed");
                }
                return Err(e);
            }
        };

        if let Some(output) = result {
            self.emit_returned(output)?;
        }

        self.emit_collected()?;

        debug!("packet processed");
        Ok(())
    }
}
