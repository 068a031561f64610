//! Custom analytics events
//!
//! A [`CustomEvent`] is recorded by running the native
//! `add_custom_event_action` with the event as the action argument.

use serde::Serialize;
use serde_json::{Map, Value};

/// Action that records a custom event.
pub const ADD_CUSTOM_EVENT_ACTION: &str = "add_custom_event_action";

/// An application-defined analytics event.
///
/// # Examples
///
/// ```
/// use core_service::CustomEvent;
///
/// let event = CustomEvent::new("purchase")
///     .with_value(19.99)
///     .with_transaction_id("tx-1")
///     .with_property("sku", "B-42");
/// assert_eq!(event.name(), "purchase");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomEvent {
    #[serde(rename = "event_name")]
    name: String,
    #[serde(rename = "event_value", skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<String>,
    properties: Map<String, Value>,
}

impl CustomEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            transaction_id: None,
            properties: Map::new(),
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Adds a property; a later property with the same name replaces it.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Argument for [`ADD_CUSTOM_EVENT_ACTION`].
    pub fn to_action_value(&self) -> Value {
        let mut value = Map::new();
        value.insert("event_name".to_string(), Value::String(self.name.clone()));
        if let Some(event_value) = self.value {
            value.insert("event_value".to_string(), Value::from(event_value));
        }
        if let Some(transaction_id) = &self.transaction_id {
            value.insert(
                "transaction_id".to_string(),
                Value::String(transaction_id.clone()),
            );
        }
        value.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        Value::Object(value)
    }
}
