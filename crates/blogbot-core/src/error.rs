//! Error types for blogbot-core

use thiserror::Error;

/// Main error type for blogbot-core
///
/// Only setup-time failures end up here. Failures of a single conversation
/// are reported through [`crate::PublishOutcome`] and
/// [`crate::GenerationOutcome`] instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for blogbot-core
pub type Result<T> = std::result::Result<T, Error>;
