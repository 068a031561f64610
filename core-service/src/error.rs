use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Native module error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Editor error: {0}")]
    Editor(#[from] core_editors::EditorError),

    /// A promise resolved with a value of the wrong shape.
    #[error("Invalid response from {method}: {source}")]
    InvalidResponse {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Action rejected: {0}")]
    ActionRejected(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
