//! Error types for the ScenePilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The split mirrors the
//! propagation policy: configuration, protocol, and iteration-limit errors
//! surface to the caller of a run; tool failures are contained inside the
//! registry and become conversational content.

use thiserror::Error;

/// The top-level error type for ScenePilot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Fails fast before any request is sent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Aborts the run; no partial message is appended for the iteration.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The iteration cap was exceeded; the session keeps everything appended
    /// so far.
    #[error("Conversation exceeded the maximum of {max_iterations} iterations")]
    IterationLimit { max_iterations: u32 },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the wire layer: transport failures and structurally invalid
/// responses.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    #[error("Response contained no choices")]
    EmptyChoices,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited by backend, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors raised by tool implementations. These never cross the registry
/// boundary: `ToolRegistry::execute` renders them as result text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_limit_displays_cap() {
        let err = Error::IterationLimit { max_iterations: 50 };
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn protocol_error_converts_to_top_level() {
        let err: Error = ProtocolError::EmptyChoices.into();
        assert!(matches!(err, Error::Protocol(ProtocolError::EmptyChoices)));
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn tool_error_displays_reason() {
        let err = ToolError::ExecutionFailed {
            tool_name: "create_object".into(),
            reason: "duplicate name".into(),
        };
        assert!(err.to_string().contains("create_object"));
        assert!(err.to_string().contains("duplicate name"));
    }
}
