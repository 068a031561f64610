//! Batched mutation payloads handed to the native module.
//!
//! These are the wire shapes produced by the tag group and attribute editors
//! after compaction:
//!
//! ```text
//! { "type": "add" | "remove", "group": "...", "tags": ["..."] }
//! { "type": "set" | "remove", "key": "...", "value": ..., "timestamp": "2024-05-01T12:00:00Z" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a tag group mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagOperationType {
    Add,
    Remove,
}

/// One tag group mutation as sent across the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGroupOperation {
    #[serde(rename = "type")]
    pub operation_type: TagOperationType,
    pub group: String,
    pub tags: Vec<String>,
}

impl TagGroupOperation {
    pub fn add(group: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            operation_type: TagOperationType::Add,
            group: group.into(),
            tags,
        }
    }

    pub fn remove(group: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            operation_type: TagOperationType::Remove,
            group: group.into(),
            tags,
        }
    }
}

/// Kind of an attribute mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeOperationType {
    Set,
    Remove,
}

/// Attribute value types the native SDK accepts.
///
/// Dates travel as ISO-8601 strings, so the JSON form of a `Date` is not
/// distinguishable from a `String` on the receiving side; native modules
/// receive the typed value through [`NativeCommand`](crate::native::NativeCommand)
/// and are expected to inspect the variant, not the JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl AttributeValue {
    /// Name of the value type, used in log fields and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "string",
            AttributeValue::Number(_) => "number",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Date(_) => "date",
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Date(value)
    }
}

/// One attribute mutation as sent across the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeOperation {
    #[serde(rename = "type")]
    pub operation_type: AttributeOperationType,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<AttributeValue>,
    /// Capture time of the edit; the native layer resolves conflicts with it.
    pub timestamp: DateTime<Utc>,
}

impl AttributeOperation {
    pub fn set(key: impl Into<String>, value: AttributeValue, timestamp: DateTime<Utc>) -> Self {
        Self {
            operation_type: AttributeOperationType::Set,
            key: key.into(),
            value: Some(value),
            timestamp,
        }
    }

    pub fn remove(key: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            operation_type: AttributeOperationType::Remove,
            key: key.into(),
            value: None,
            timestamp,
        }
    }
}
