//! # Contracts
//!
//! Frozen interface contracts for the tagged dataflow core, defining the
//! data structures and traits shared between operators, delegates and the
//! surrounding scheduler. Business crates can only depend on this crate,
//! reverse dependencies are prohibited.
//!
//! ## Routing Model
//! - A [`Packet`] is an immutable `(Value, Option<Tag>)` pair
//! - `tag = None` addresses the default/unnamed channel
//! - Routing tables map a channel to the ordered set of downstream operators

mod collector;
mod config;
mod error;
mod packet;
mod tag;
mod transform;
mod value;

pub use collector::{Collector, CollectorStats, SharedCollector};
pub use config::OperatorConfig;
pub use error::FlowError;
pub use packet::Packet;
pub use tag::Tag;
pub use transform::{Predicate, Transform};
pub use value::Value;
