//! Downstream routing - per-operator tag -> downstream mapping
//!
//! The routing table is built once at pipeline-construction time and is
//! effectively read-only afterwards. Delivery order for a channel equals
//! registration order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use contracts::{FlowError, Packet, Tag};

use crate::operator::Operator;

/// Handle to a downstream operator, used only for routing.
///
/// The handle does not govern the downstream's lifetime in any meaningful
/// sense - the pipeline graph does - it merely keeps the reference alive
/// and serializes delivery. `deliver` locks the downstream and invokes its
/// `receive` synchronously, so a slow downstream blocks the caller
/// (implicit backpressure).
#[derive(Clone)]
pub struct DownstreamHandle {
    name: String,
    inner: Arc<Mutex<dyn Operator + Send>>,
}

impl DownstreamHandle {
    /// Wrap an operator, returning the handle and a shared reference kept
    /// for later inspection (used heavily by tests).
    pub fn wrap<O: Operator + 'static>(operator: O) -> (Self, Arc<Mutex<O>>) {
        let shared = Arc::new(Mutex::new(operator));
        (Self::from_shared(shared.clone()), shared)
    }

    /// Create a handle from an already-shared operator.
    pub fn from_shared<O: Operator + 'static>(operator: Arc<Mutex<O>>) -> Self {
        let name = operator.lock().unwrap().name().to_string();
        Self {
            name,
            inner: operator,
        }
    }

    /// Downstream operator name (diagnostics).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether two handles point at the same operator instance.
    #[inline]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Deliver a packet by synchronously invoking the downstream `receive`.
    pub fn deliver(&self, packet: Packet) -> Result<(), FlowError> {
        self.inner.lock().unwrap().receive(packet)
    }
}

impl std::fmt::Debug for DownstreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownstreamHandle")
            .field("name", &self.name)
            .finish()
    }
}

/// Per-operator mapping from channel to the ordered set of downstreams.
///
/// `None` keys address the default/unnamed channel. Registration has set
/// semantics by operator instance identity: re-registering the same
/// instance under the same channel is a no-op.
#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
    routes: HashMap<Option<Tag>, Vec<DownstreamHandle>>,
}

impl RoutingTable {
    /// Create an empty routing table (a terminal sink operator).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a downstream on the default channel.
    pub fn register_default(&mut self, handle: DownstreamHandle) {
        self.register(None, handle);
    }

    /// Register a downstream on a channel.
    pub fn register(&mut self, tag: Option<Tag>, handle: DownstreamHandle) {
        let entry = self.routes.entry(tag).or_default();
        if entry.iter().any(|existing| existing.same_instance(&handle)) {
            return;
        }
        entry.push(handle);
    }

    /// Ordered downstreams for a channel; empty slice on a routing miss.
    pub fn targets(&self, tag: Option<&Tag>) -> &[DownstreamHandle] {
        self.routes
            .get(&tag.cloned())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of channels with at least one registered downstream.
    pub fn channel_count(&self) -> usize {
        self.routes.len()
    }

    /// Whether no downstream is registered on any channel.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
