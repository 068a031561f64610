use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported value for attribute '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, EditorError>;
