//! Operator base contract - receive entry point and emission routing

use std::path::{Path, PathBuf};

use tracing::{debug, info_span, Span};

use contracts::{FlowError, OperatorConfig, Packet, Tag, Value};

use crate::metrics::{OperatorMetrics, OperatorMetricsSnapshot};
use crate::routing::RoutingTable;

/// A pipeline stage: consumes packets, produces zero-or-more tagged items.
///
/// `receive` is the sole data-plane entry point. Calls on one instance are
/// strictly serialized - the core assumes the external scheduler never
/// issues two concurrent `receive` calls into the same instance, and the
/// per-handle mutex in [`crate::DownstreamHandle`] incidentally enforces it.
///
/// # Errors
/// Any fault raised while processing the packet surfaces verbatim; items
/// already emitted downstream before the failure point are not retracted.
pub trait Operator: Send {
    /// Diagnostic name of this operator instance.
    fn name(&self) -> &str;

    /// Process one packet, emitting downstream as a side effect.
    fn receive(&mut self, packet: Packet) -> Result<(), FlowError>;
}

/// Shared per-instance state composed into every concrete operator:
/// diagnostic identity, routing table, metrics and the instance-scoped
/// tracing span.
///
/// `emit` is the subclass-facing half of the contract - concrete operators
/// call it, external callers go through [`Operator::receive`].
pub struct OperatorCore {
    name: String,
    session_dir: Option<PathBuf>,
    routes: RoutingTable,
    span: Span,
    metrics: OperatorMetrics,
}

impl OperatorCore {
    /// Build the core from validated configuration and a fixed routing table.
    pub fn new(config: OperatorConfig, routes: RoutingTable) -> Result<Self, FlowError> {
        config.check()?;
        let span = info_span!("operator", name = %config.name);
        Ok(Self {
            name: config.name,
            session_dir: config.session_dir,
            routes,
            span,
            metrics: OperatorMetrics::new(),
        })
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque storage/session hint from construction-time configuration.
    pub fn session_dir(&self) -> Option<&Path> {
        self.session_dir.as_deref()
    }

    /// The instance-scoped diagnostic span.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Routing table (read-only after construction).
    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Snapshot of this instance's counters.
    pub fn metrics(&self) -> OperatorMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Route one produced item to every downstream registered for `tag`.
    ///
    /// Delivery is synchronous and in registration order; each downstream
    /// gets a freshly constructed packet. Zero registered downstreams is a
    /// valid terminal sink state: the item is silently dropped, counted as
    /// a routing miss, never a fault.
    pub fn emit(&self, value: Value, tag: Option<Tag>) -> Result<(), FlowError> {
        let targets = self.routes.targets(tag.as_ref());
        if targets.is_empty() {
            self.metrics.inc_routing_misses();
            observability::record_routing_miss(&self.name);
            debug!(tag = tag.as_deref(), "no downstream registered, item dropped");
            return Ok(());
        }

        for handle in targets {
            debug!(downstream = handle.name(), tag = tag.as_deref(), "emit");
            handle.deliver(Packet::with_tag(value.clone(), tag.clone()))?;
        }

        self.metrics.inc_items_emitted();
        observability::record_items_emitted(&self.name, tag.as_deref().unwrap_or("default"));
        Ok(())
    }

    /// Bookkeeping at the top of every `receive`.
    pub fn note_packet(&self) {
        self.metrics.inc_packets_received();
        observability::record_packet_received(&self.name);
    }

    /// Record a fault: structured error log plus counters.
    ///
    /// Logging here never alters control flow - the caller still propagates
    /// the error verbatim.
    pub fn note_fault(&self, phase: &'static str, error: &FlowError) {
        self.metrics.inc_faults();
        observability::record_fault(&self.name, phase);
        tracing::error!(operator = %self.name, phase, error = %error, "packet processing failed");
    }
}

impl std::fmt::Debug for OperatorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorCore")
            .field("name", &self.name)
            .field("channels", &self.routes.channel_count())
            .finish()
    }
}
