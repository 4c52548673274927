use std::fmt;

use serde_json::Value;

/// How a cross-function call failed. The three remote classes are kept
/// distinct so callers can tell an infrastructure problem from a crashed
/// function from a deliberate application error.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// The invocation service itself failed: unreachable, unexpected status,
    /// or a payload the service should never have produced.
    Transport(String),
    /// The remote function terminated via an uncaught exception; its error
    /// payload is propagated verbatim.
    Unhandled(Value),
    /// The remote function completed but signaled an application error,
    /// recovered as structured JSON where possible.
    Handled(Value),
    /// The transport reported a failure mode this client does not recognize.
    /// This should never occur.
    Protocol(String),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Transport(message) => write!(f, "invocation transport error: {}", message),
            InvokeError::Unhandled(payload) => write!(f, "remote function crashed: {}", payload),
            InvokeError::Handled(payload) => write!(f, "remote function error: {}", payload),
            InvokeError::Protocol(message) => write!(f, "invocation protocol error: {}", message),
        }
    }
}

impl std::error::Error for InvokeError {}
