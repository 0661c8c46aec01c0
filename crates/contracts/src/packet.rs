//! Packet - Addressed unit of data flowing between operators

use serde::{Deserialize, Serialize};

use crate::{Tag, Value};

/// Immutable `(value, tag)` pair flowing between operators.
///
/// Constructed once, then handed downstream by value; fields are private so
/// immutability is structural rather than conventional. `tag = None` means
/// the packet travels on the default/unnamed channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Opaque payload
    value: Value,

    /// Routing label (None = default channel)
    tag: Option<Tag>,
}

impl Packet {
    /// Create a packet on the default channel.
    #[inline]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            tag: None,
        }
    }

    /// Create a packet addressed to a named channel.
    #[inline]
    pub fn tagged(value: impl Into<Value>, tag: impl Into<Tag>) -> Self {
        Self {
            value: value.into(),
            tag: Some(tag.into()),
        }
    }

    /// Create a packet with an already-optional tag.
    #[inline]
    pub fn with_tag(value: impl Into<Value>, tag: Option<Tag>) -> Self {
        Self {
            value: value.into(),
            tag,
        }
    }

    /// Borrow the payload.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Borrow the routing tag.
    #[inline]
    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    /// Consume the packet, taking ownership of the payload.
    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Consume the packet into its parts.
    #[inline]
    pub fn into_parts(self) -> (Value, Option<Tag>) {
        (self.value, self.tag)
    }
}
