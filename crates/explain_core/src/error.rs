//! Core error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExplainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = ExplainError::Config("root is not a directory".to_string());
        assert_eq!(err.to_string(), "config error: root is not a directory");
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ExplainError::from(io_err);
        assert_eq!(err.to_string(), "file not found");
    }
}
