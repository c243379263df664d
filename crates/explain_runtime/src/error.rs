//! Runtime error types

use thiserror::Error;

/// Failures that abort a run. Per-file problems never show up here; they
/// become report entries instead.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Core(#[from] explain_core::ExplainError),

    #[error(transparent)]
    Llm(#[from] explain_llms::Error),
}

impl RuntimeError {
    /// True for failures raised before any file is processed.
    pub fn is_configuration(&self) -> bool {
        match self {
            RuntimeError::ConfigError(_) => true,
            RuntimeError::Core(err) => matches!(err, explain_core::ExplainError::Config(_)),
            RuntimeError::Llm(err) => err.is_configuration(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
