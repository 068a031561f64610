//! # Message View Events
//!
//! The native inbox message view reports its lifecycle through four
//! callbacks: `onLoadStarted`, `onLoadFinished`, `onLoadError` and
//! `onClose`. This module decodes those callbacks into [`MessageViewEvent`]
//! and routes them to the handlers a host registered on
//! [`MessageViewCallbacks`]. A callback without a handler is dropped.
//!
//! ```
//! use core_service::message_view::{MessageViewCallbacks, MessageLoadError};
//! use serde_json::json;
//!
//! let callbacks = MessageViewCallbacks::new()
//!     .on_load_error(|event| assert_eq!(event.error, MessageLoadError::NotAvailable));
//!
//! let forwarded = callbacks
//!     .handle_native(
//!         "onLoadError",
//!         json!({"messageId": "m-1", "retryable": false, "error": "MESSAGE_NOT_AVAILABLE"}),
//!     )
//!     .unwrap();
//! assert!(forwarded);
//! ```

use std::fmt;

use core_runtime::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Why a message failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageLoadError {
    /// The message is not in the inbox (deleted or expired).
    #[serde(rename = "MESSAGE_NOT_AVAILABLE")]
    NotAvailable,
    /// The message body could not be fetched; retrying may help.
    #[serde(rename = "FAILED_TO_FETCH_MESSAGE")]
    FetchFailed,
    #[serde(rename = "MESSAGE_LOAD_FAILED")]
    LoadFailed,
}

impl MessageLoadError {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageLoadError::NotAvailable => "MESSAGE_NOT_AVAILABLE",
            MessageLoadError::FetchFailed => "FAILED_TO_FETCH_MESSAGE",
            MessageLoadError::LoadFailed => "MESSAGE_LOAD_FAILED",
        }
    }
}

impl fmt::Display for MessageLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of the started, finished and close callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLoadErrorEvent {
    pub message_id: String,
    pub retryable: bool,
    pub error: MessageLoadError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageViewEvent {
    LoadStarted(MessageEvent),
    LoadFinished(MessageEvent),
    LoadError(MessageLoadErrorEvent),
    Close(MessageEvent),
}

impl MessageViewEvent {
    /// Decodes a native view callback by name.
    ///
    /// Unknown callback names fail with [`Error::UnknownEventType`]; a body
    /// of the wrong shape fails with [`Error::InvalidEventPayload`].
    pub fn decode(callback: &str, body: Value) -> Result<Self> {
        match callback {
            "onLoadStarted" => decode_body(callback, body).map(Self::LoadStarted),
            "onLoadFinished" => decode_body(callback, body).map(Self::LoadFinished),
            "onLoadError" => decode_body(callback, body).map(Self::LoadError),
            "onClose" => decode_body(callback, body).map(Self::Close),
            other => Err(Error::UnknownEventType(other.to_string())),
        }
    }

    pub fn callback_name(&self) -> &'static str {
        match self {
            MessageViewEvent::LoadStarted(_) => "onLoadStarted",
            MessageViewEvent::LoadFinished(_) => "onLoadFinished",
            MessageViewEvent::LoadError(_) => "onLoadError",
            MessageViewEvent::Close(_) => "onClose",
        }
    }

    pub fn message_id(&self) -> &str {
        match self {
            MessageViewEvent::LoadStarted(event)
            | MessageViewEvent::LoadFinished(event)
            | MessageViewEvent::Close(event) => &event.message_id,
            MessageViewEvent::LoadError(event) => &event.message_id,
        }
    }
}

fn decode_body<T: DeserializeOwned>(callback: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| Error::InvalidEventPayload {
        event: callback.to_string(),
        source,
    })
}

type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Host handlers for a message view. Every handler is optional.
#[derive(Default)]
pub struct MessageViewCallbacks {
    load_started: Option<Handler<MessageEvent>>,
    load_finished: Option<Handler<MessageEvent>>,
    load_error: Option<Handler<MessageLoadErrorEvent>>,
    close: Option<Handler<MessageEvent>>,
}

impl MessageViewCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_load_started<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MessageEvent) + Send + Sync + 'static,
    {
        self.load_started = Some(Box::new(handler));
        self
    }

    pub fn on_load_finished<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MessageEvent) + Send + Sync + 'static,
    {
        self.load_finished = Some(Box::new(handler));
        self
    }

    pub fn on_load_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MessageLoadErrorEvent) + Send + Sync + 'static,
    {
        self.load_error = Some(Box::new(handler));
        self
    }

    pub fn on_close<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MessageEvent) + Send + Sync + 'static,
    {
        self.close = Some(Box::new(handler));
        self
    }

    /// Forwards `event` to its handler. Returns `false` if none is set.
    pub fn handle(&self, event: &MessageViewEvent) -> bool {
        let forwarded = match event {
            MessageViewEvent::LoadStarted(payload) => forward(&self.load_started, payload),
            MessageViewEvent::LoadFinished(payload) => forward(&self.load_finished, payload),
            MessageViewEvent::LoadError(payload) => forward(&self.load_error, payload),
            MessageViewEvent::Close(payload) => forward(&self.close, payload),
        };

        if !forwarded {
            trace!(callback = event.callback_name(), "No message view handler set");
        }
        forwarded
    }

    /// Decodes a native callback and forwards it.
    pub fn handle_native(&self, callback: &str, body: Value) -> Result<bool> {
        let event = MessageViewEvent::decode(callback, body)?;
        Ok(self.handle(&event))
    }
}

fn forward<E>(handler: &Option<Handler<E>>, payload: &E) -> bool {
    match handler {
        Some(handler) => {
            handler(payload);
            true
        }
        None => false,
    }
}

impl fmt::Debug for MessageViewCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageViewCallbacks")
            .field("on_load_started", &self.load_started.is_some())
            .field("on_load_finished", &self.load_finished.is_some())
            .field("on_load_error", &self.load_error.is_some())
            .field("on_close", &self.close.is_some())
            .finish()
    }
}
