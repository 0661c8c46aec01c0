//! Mock operators - terminal probes for unit and integration tests
//!
//! Kept in the library (not behind `cfg(test)`) so downstream crates can
//! wire them into test pipelines.

use std::sync::{Arc, Mutex};

use tracing::debug;

use contracts::{FlowError, Packet};

use crate::operator::Operator;
use crate::routing::DownstreamHandle;

/// Shared view of everything a [`CaptureOperator`] received.
pub type CaptureBuffer = Arc<Mutex<Vec<Packet>>>;

/// Terminal operator that records every received packet.
pub struct CaptureOperator {
    name: String,
    received: CaptureBuffer,
}

impl CaptureOperator {
    /// Create a new capture operator with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create the operator pre-wrapped as a downstream handle, returning
    /// the buffer for later inspection.
    pub fn spawn(name: impl Into<String>) -> (DownstreamHandle, CaptureBuffer) {
        let operator = Self::new(name);
        let buffer = operator.buffer();
        let (handle, _) = DownstreamHandle::wrap(operator);
        (handle, buffer)
    }

    /// Shared handle to the capture buffer.
    pub fn buffer(&self) -> CaptureBuffer {
        self.received.clone()
    }

    /// Snapshot of everything received so far.
    pub fn captured(&self) -> Vec<Packet> {
        self.received.lock().unwrap().clone()
    }
}

impl Operator for CaptureOperator {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&mut self, packet: Packet) -> Result<(), FlowError> {
        debug!(operator = %self.name, value = ?packet.value(), "packet captured");
        self.received.lock().unwrap().push(packet);
        Ok(())
    }
}

/// Terminal operator that fails on every packet.
///
/// Used to exercise fault propagation through the synchronous emission
/// recursion.
pub struct FailingOperator {
    name: String,
    message: String,
}

impl FailingOperator {
    /// Create a failing operator with the given name and fault message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl Operator for FailingOperator {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&mut self, _packet: Packet) -> Result<(), FlowError> {
        Err(FlowError::transform(self.message.clone()))
    }
}
