//! Transform trait - delegate abstraction
//!
//! Defines the capability contract the core requires from user-supplied
//! transform logic, decoupling operators from concrete delegate types.

use crate::{FlowError, SharedCollector, Value};

/// User-supplied transform logic invoked by an operator per packet.
///
/// A delegate produces output through two non-exclusive channels:
/// the return value of [`execute`](Transform::execute), and items pushed
/// into a [`crate::Collector`] during the call.
///
/// # Collecting capability
///
/// A delegate that wants a collector declares it explicitly through
/// [`uses_collector`](Transform::uses_collector) - capability is queried,
/// never inferred from the concrete type. The owning operator then injects
/// a [`SharedCollector`] exactly once, at construction, via
/// [`insert_collector`](Transform::insert_collector). Delegates without the
/// capability never see a collector and the operator does not allocate one
/// for them.
///
/// # Example
///
/// ```
/// use contracts::{FlowError, SharedCollector, Transform, Value};
///
/// struct WordSplit {
///     out: Option<SharedCollector>,
/// }
///
/// impl Transform for WordSplit {
///     fn execute(&mut self, value: Value) -> Result<Option<Value>, FlowError> {
///         if let (Value::Text(line), Some(out)) = (value, &self.out) {
///             let mut out = out.lock().unwrap();
///             for word in line.split_whitespace() {
///                 out.collect(word);
///             }
///         }
///         Ok(None)
///     }
///
///     fn uses_collector(&self) -> bool {
///         true
///     }
///
///     fn insert_collector(&mut self, collector: SharedCollector) {
///         self.out = Some(collector);
///     }
/// }
/// ```
pub trait Transform: Send {
    /// Transform one input value into zero-or-one returned output.
    ///
    /// `Ok(None)` is the absent sentinel: nothing flows through the return
    /// channel. A returned `Value::Seq` is expanded element-by-element by a
    /// FlatMap-style operator; any other value is a single output item.
    ///
    /// # Errors
    /// A fault here is fatal to the current packet; the operator logs it
    /// with context and propagates it verbatim.
    fn execute(&mut self, value: Value) -> Result<Option<Value>, FlowError>;

    /// Whether this delegate wants a collector injected.
    fn uses_collector(&self) -> bool {
        false
    }

    /// Receive the operator's collector handle.
    ///
    /// Called exactly once at construction, and only when
    /// [`uses_collector`](Transform::uses_collector) returns true.
    fn insert_collector(&mut self, _collector: SharedCollector) {}
}

// Plain closures work as non-collecting delegates
impl<F> Transform for F
where
    F: FnMut(Value) -> Result<Option<Value>, FlowError> + Send,
{
    fn execute(&mut self, value: Value) -> Result<Option<Value>, FlowError> {
        self(value)
    }
}

/// User-supplied pass/drop decision invoked by a filter operator per packet.
pub trait Predicate: Send {
    /// Decide whether the value passes. The value itself is never modified.
    ///
    /// # Errors
    /// A fault here is fatal to the current packet and propagates verbatim.
    fn test(&mut self, value: &Value) -> Result<bool, FlowError>;
}

impl<F> Predicate for F
where
    F: FnMut(&Value) -> Result<bool, FlowError> + Send,
{
    fn test(&mut self, value: &Value) -> Result<bool, FlowError> {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_as_transform() {
        let mut double = |value: Value| -> Result<Option<Value>, FlowError> {
            match value {
                Value::Int(i) => Ok(Some(Value::Int(i * 2))),
                other => Ok(Some(other)),
            }
        };

        let result = double.execute(Value::Int(21)).unwrap();
        assert_eq!(result, Some(Value::Int(42)));
        assert!(!double.uses_collector());
    }

    #[test]
    fn test_closure_as_predicate() {
        let mut positive =
            |value: &Value| -> Result<bool, FlowError> { Ok(value.as_int().unwrap_or(0) > 0) };

        assert!(positive.test(&Value::Int(1)).unwrap());
        assert!(!positive.test(&Value::Int(-1)).unwrap());
    }
}
