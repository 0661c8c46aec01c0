//! # Operators
//!
//! Tagged dataflow operator execution core: routing tables, the operator
//! base contract, and the concrete FlatMap/Map/Filter operators.
//!
//! ## Execution Model
//!
//! - The external scheduler delivers a [`contracts::Packet`] to an
//!   operator's `receive`; the operator invokes its transform delegate
//! - The delegate produces items through the return channel, the collector
//!   channel, or both; the operator reconciles them into one deterministic
//!   emission sequence (return channel strictly first)
//! - `emit` routes each item synchronously into the downstream operators
//!   registered for its tag; a tag without downstreams is a valid terminal
//!   sink state, not an error
//!
//! Everything here is synchronous and single-threaded per instance:
//! `receive` calls on one operator never overlap, and `emit` recurses
//! directly into downstream `receive` calls, so backpressure is implicit.

mod filter;
mod flat_map;
mod map;
mod metrics;
mod mock;
mod operator;
mod routing;

pub use filter::{FilterOperator, FilterStats};
pub use flat_map::FlatMapOperator;
pub use map::MapOperator;
pub use metrics::{OperatorMetrics, OperatorMetricsSnapshot};
pub use mock::{CaptureBuffer, CaptureOperator, FailingOperator};
pub use operator::{Operator, OperatorCore};
pub use routing::{DownstreamHandle, RoutingTable};
