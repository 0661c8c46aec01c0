//! Collector - Operator-owned buffer for imperative emission
//!
//! A transform delegate with the collecting capability pushes output items
//! here instead of (or in addition to) returning them. The owning operator
//! drains the buffer after every delegate invocation, so the buffer is
//! guaranteed empty on entry and on exit of each packet's processing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::{Tag, Value};

/// Shared handle to an operator's [`Collector`].
///
/// Injected into a collecting delegate exactly once, at operator
/// construction. The mutex exists only because the handle crosses the
/// delegate boundary; all access is strictly serialized because `receive`
/// calls on one operator instance never overlap.
pub type SharedCollector = Arc<Mutex<Collector>>;

/// Ordered buffer of `(value, tag)` pairs collected during one invocation.
///
/// Not safe for concurrent use on its own; single-owner and
/// single-invocation-scoped (see [`SharedCollector`]).
#[derive(Debug, Default)]
pub struct Collector {
    /// Buffered items, in collection order
    buffer: Vec<(Value, Option<Tag>)>,

    /// Lifetime count of items ever collected (survives drain/clear)
    total_collected: u64,

    /// Lifetime per-channel distribution
    tag_counts: HashMap<String, u64>,

    /// Opaque storage/session location hint from the owning operator
    session_dir: Option<PathBuf>,
}

impl Collector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collector carrying a storage/session hint.
    pub fn with_session(session_dir: Option<PathBuf>) -> Self {
        Self {
            session_dir,
            ..Self::default()
        }
    }

    /// Create a collector behind a shared handle.
    pub fn shared() -> SharedCollector {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Create a shared collector carrying a storage/session hint.
    pub fn shared_with_session(session_dir: Option<PathBuf>) -> SharedCollector {
        Arc::new(Mutex::new(Self::with_session(session_dir)))
    }

    /// The storage/session hint, if the owning operator provided one.
    pub fn session_dir(&self) -> Option<&Path> {
        self.session_dir.as_deref()
    }

    /// Append an item to the default channel.
    #[inline]
    pub fn collect(&mut self, value: impl Into<Value>) {
        self.push(value.into(), None);
    }

    /// Append an item to a named channel.
    #[inline]
    pub fn collect_tagged(&mut self, value: impl Into<Value>, tag: impl Into<Tag>) {
        self.push(value.into(), Some(tag.into()));
    }

    /// Append a batch of items to the default channel.
    pub fn collect_multiple<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for value in values {
            self.push(value.into(), None);
        }
    }

    fn push(&mut self, value: Value, tag: Option<Tag>) {
        self.total_collected += 1;
        let channel = tag.as_deref().unwrap_or("default").to_string();
        *self.tag_counts.entry(channel).or_insert(0) += 1;
        self.buffer.push((value, tag));
    }

    /// Return the full ordered sequence and atomically empty the buffer.
    ///
    /// The buffer is guaranteed empty immediately after return; this is how
    /// the empty-on-exit invariant is enforced structurally rather than by
    /// convention.
    #[inline]
    pub fn drain(&mut self) -> Vec<(Value, Option<Tag>)> {
        std::mem::take(&mut self.buffer)
    }

    /// Empty the buffer without returning contents.
    ///
    /// Used defensively before processing starts, guarding against residue
    /// from a faulted prior invocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Read-only snapshot of the currently buffered (pre-drain) contents.
    pub fn buffered(&self) -> Vec<(Value, Option<Tag>)> {
        self.buffer.clone()
    }

    /// Number of currently buffered items.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is currently empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Lifetime statistics for observability.
    ///
    /// A never-used collector reports the zero struct.
    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            total_collected: self.total_collected,
            buffered: self.buffer.len(),
            tag_counts: self.tag_counts.clone(),
        }
    }
}

/// Snapshot of collector counters (for reporting).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectorStats {
    /// Items ever collected across the collector's lifetime
    pub total_collected: u64,

    /// Items currently buffered (pre-drain)
    pub buffered: usize,

    /// Lifetime item count per channel ("default" for the unnamed channel)
    pub tag_counts: HashMap<String, u64>,
}
