//! Error types for the call tracer
//!
//! The trace listener itself never fails; these errors cover session
//! lifecycle misuse, configuration loading and event script parsing.

use thiserror::Error;

/// Errors that can occur while configuring or driving a trace session
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("A trace session is already active in this process")]
    SessionActive,

    #[error("No trace session is active")]
    NoActiveSession,

    #[error("The runtime already has a trace listener registered")]
    ListenerBusy,

    #[error("Invalid tracer configuration: {0}")]
    Config(String),

    #[error("Invalid event script: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tracer operations
pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(TraceError::SessionActive.to_string().contains("already active"));
        assert!(TraceError::Config("max_depth".into())
            .to_string()
            .contains("max_depth"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TraceError = io.into();
        assert!(matches!(err, TraceError::Io(_)));
    }
}
