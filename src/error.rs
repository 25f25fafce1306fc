//! Error types for Morning Buddy.

use thiserror::Error;

/// Library-level error type for Morning Buddy operations.
#[derive(Error, Debug)]
pub enum BuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Language model error: {0}")]
    Provider(String),

    #[error("Language model returned no usable candidate")]
    EmptyCandidate,

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Morning Buddy operations.
pub type Result<T> = std::result::Result<T, BuddyError>;
