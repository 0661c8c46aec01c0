//! Value - Opaque payload flowing between operators
//!
//! The core performs no validation on payload contents; the only structural
//! distinction it ever makes is "sequence vs. atomic" during FlatMap
//! expansion.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Payload carried by a [`crate::Packet`].
///
/// The core treats the payload as fully opaque except for one rule used by
/// sequence expansion: only [`Value::Seq`] is expanded element-by-element.
/// `Text` and `Bytes` are atomic payloads and are deliberately never
/// iterated character-by-character or byte-by-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Boolean scalar
    Bool(bool),

    /// Signed integer scalar
    Int(i64),

    /// Floating point scalar
    Float(f64),

    /// Text payload (atomic - never expanded)
    Text(String),

    /// Raw bytes payload (atomic - never expanded, zero-copy)
    Bytes(Bytes),

    /// Ordered sequence of values (the only expandable shape)
    Seq(Vec<Value>),
}

impl Value {
    /// Whether sequence expansion applies to this payload.
    #[inline]
    pub fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    /// Borrow the text content, if this is a `Text` payload.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the integer content, if this is an `Int` payload.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Bytes> for Value {
    #[inline]
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}
