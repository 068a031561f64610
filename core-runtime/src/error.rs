use bridge_traits::Platform;
use thiserror::Error;

use crate::capabilities::Capability;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    #[error("Invalid payload for event {event}: {source}")]
    InvalidEventPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{capability} is not supported on {platform}")]
    UnsupportedOnPlatform {
        capability: Capability,
        platform: Platform,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
