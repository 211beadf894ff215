//! Generator client error types.

use std::sync::Arc;

/// Errors from the generator backend client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeneratorError {
    /// The client could not be set up (e.g., an unparsable base URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The backend answered with an error message.
    #[error("{0}")]
    Remote(String),

    /// The backend failed without a readable error payload.
    #[error("API error: {status}")]
    HttpStatus { status: u16 },

    /// Network, DNS or connection failure.
    #[error("transport error: {0}")]
    Transport(Arc<reqwest::Error>),

    /// A success response whose body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        GeneratorError::Transport(Arc::new(err))
    }
}

impl From<GeneratorError> for insyt_core::Error {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::InvalidRequest(msg) => insyt_core::Error::InvalidInput(msg),
            GeneratorError::Remote(msg) => insyt_core::Error::Remote(msg),
            GeneratorError::HttpStatus { status } => insyt_core::Error::HttpStatus(status),
            GeneratorError::Transport(e) => insyt_core::Error::Transport(e.to_string()),
            GeneratorError::Parse(msg) => insyt_core::Error::Transport(format!("malformed response: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeneratorError::Remote("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");

        let err = GeneratorError::HttpStatus { status: 502 };
        assert_eq!(err.to_string(), "API error: 502");
    }

    #[test]
    fn test_into_core_error() {
        let err: insyt_core::Error = GeneratorError::Remote("quota exceeded".into()).into();
        assert!(matches!(err, insyt_core::Error::Remote(ref m) if m == "quota exceeded"));

        let err: insyt_core::Error = GeneratorError::HttpStatus { status: 500 }.into();
        assert!(matches!(err, insyt_core::Error::HttpStatus(500)));
    }
}
