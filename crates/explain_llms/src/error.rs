//! Error types for the chat client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No API key available; raised before any network call
    #[error("missing API key: set {0}")]
    MissingApiKey(String),

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Network failure, timeout or client build failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("chat endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Configuration failures are fatal; everything else is a per-request transport failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MissingApiKey(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
