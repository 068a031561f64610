//! Attribute Editor
//!
//! Accumulates attribute sets and removals and collapses them to at most one
//! operation per key on [`apply`](AttributeEditor::apply). The last call for
//! a key wins entirely and keeps the timestamp captured when it was made.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bridge_traits::operations::{AttributeOperation, AttributeValue};
use bridge_traits::time::{Clock, SystemClock};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EditorError, Result};
use crate::sink::OperationSink;

/// Editor for channel or named user attributes.
///
/// Single-use: [`apply`](Self::apply) consumes the editor.
pub struct AttributeEditor {
    pending: Vec<AttributeOperation>,
    clock: Arc<dyn Clock>,
    sink: Box<dyn OperationSink<AttributeOperation>>,
}

impl AttributeEditor {
    /// Creates an editor stamping operations with the system clock.
    pub fn new(sink: impl OperationSink<AttributeOperation> + 'static) -> Self {
        Self::with_clock(Arc::new(SystemClock), sink)
    }

    pub fn with_clock(
        clock: Arc<dyn Clock>,
        sink: impl OperationSink<AttributeOperation> + 'static,
    ) -> Self {
        Self {
            pending: Vec::new(),
            clock,
            sink: Box::new(sink),
        }
    }

    /// Records a set of `key` to `value`.
    ///
    /// Rejects an empty key and numbers that are not finite.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<&mut Self> {
        let key = key.into();
        let value = value.into();

        if let Err(err) = validate_key(&key).and_then(|_| validate_value(&key, &value)) {
            warn!(key = %key, error = %err, "Rejected attribute set");
            return Err(err);
        }

        let timestamp = self.clock.now();
        debug!(key = %key, value_type = value.type_name(), "Recorded attribute set");
        self.pending
            .push(AttributeOperation::set(key, value, timestamp));
        Ok(self)
    }

    /// Records a set from an untyped JSON value, as received from a dynamic
    /// host layer. Strings, numbers and booleans are accepted; anything else
    /// is rejected with [`EditorError::UnsupportedValue`].
    pub fn set_json_attribute(&mut self, key: impl Into<String>, value: &Value) -> Result<&mut Self> {
        let key = key.into();
        match attribute_value_from_json(&key, value) {
            Ok(value) => self.set_attribute(key, value),
            Err(err) => {
                warn!(key = %key, error = %err, "Rejected attribute set");
                Err(err)
            }
        }
    }

    /// Records a removal of `key`.
    pub fn remove_attribute(&mut self, key: impl Into<String>) -> Result<&mut Self> {
        let key = key.into();
        if let Err(err) = validate_key(&key) {
            warn!(error = %err, "Rejected attribute removal");
            return Err(err);
        }

        let timestamp = self.clock.now();
        debug!(key = %key, "Recorded attribute removal");
        self.pending.push(AttributeOperation::remove(key, timestamp));
        Ok(self)
    }

    /// Operations recorded so far, in call order.
    pub fn pending_operations(&self) -> &[AttributeOperation] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The batch [`apply`](Self::apply) would send, without sending it.
    pub fn compacted(&self) -> Vec<AttributeOperation> {
        compact_attribute_operations(&self.pending)
    }

    /// Compacts the log and hands the batch to the sink. The sink is not
    /// invoked when nothing was recorded.
    pub fn apply(self) {
        let operations = self.compacted();
        if operations.is_empty() {
            debug!("Attribute edit produced no operations; nothing to apply");
            return;
        }

        debug!(
            recorded = self.pending.len(),
            emitted = operations.len(),
            "Applying attribute edits"
        );
        self.sink.submit(operations);
    }
}

impl fmt::Debug for AttributeEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeEditor")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(EditorError::InvalidInput(
            "attribute key must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_value(key: &str, value: &AttributeValue) -> Result<()> {
    match value {
        AttributeValue::Number(n) if !n.is_finite() => Err(EditorError::UnsupportedValue {
            key: key.to_string(),
            reason: format!("number {} is not finite", n),
        }),
        _ => Ok(()),
    }
}

/// Converts a JSON value into an attribute value.
///
/// Strings stay strings even when they look like dates; pass a
/// `chrono::DateTime<Utc>` to [`AttributeEditor::set_attribute`] for a date.
pub fn attribute_value_from_json(key: &str, value: &Value) -> Result<AttributeValue> {
    let unsupported = |kind: &str| EditorError::UnsupportedValue {
        key: key.to_string(),
        reason: format!("{} values are not supported", kind),
    };

    match value {
        Value::String(s) => Ok(AttributeValue::String(s.clone())),
        Value::Bool(b) => Ok(AttributeValue::Boolean(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(AttributeValue::Number)
            .ok_or_else(|| unsupported("non-representable number")),
        Value::Null => Err(unsupported("null")),
        Value::Array(_) => Err(unsupported("array")),
        Value::Object(_) => Err(unsupported("object")),
    }
}

/// Collapses recorded attribute operations to the last one per key, keeping
/// keys in first-seen order.
pub fn compact_attribute_operations(pending: &[AttributeOperation]) -> Vec<AttributeOperation> {
    let mut compacted: Vec<AttributeOperation> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for operation in pending {
        match slots.get(operation.key.as_str()) {
            Some(&slot) => compacted[slot] = operation.clone(),
            None => {
                slots.insert(operation.key.as_str(), compacted.len());
                compacted.push(operation.clone());
            }
        }
    }
    compacted
}
