//! Error taxonomy for command invocation
//!
//! Command handlers signal expected failures with [`CommandError::Failure`];
//! everything else that goes wrong inside a handler is surfaced as a
//! [`CommandError::Fault`] carrying a diagnostic trace. The remaining
//! variants classify problems around the invocation itself: unresolved
//! names and lost connections.

use serde_json::Value;
use thiserror::Error;

/// Classified failure of one command invocation
#[derive(Error, Debug)]
pub enum CommandError {
    /// The requested command name has no backing handler
    #[error("Unknown command: {0}")]
    NotFound(String),

    /// Expected, caller-facing failure signaled by command logic
    #[error("{0}")]
    Failure(String),

    /// Unanticipated failure inside command execution; carries a diagnostic trace
    #[error("{0}")]
    Fault(String),

    /// The connection dropped or failed before an outcome arrived
    #[error("Transport lost: {0}")]
    TransportLost(String),
}

impl CommandError {
    /// Shorthand for an expected failure with a formatted message
    pub fn failure(message: impl Into<String>) -> Self {
        CommandError::Failure(message.into())
    }
}

/// Result of one command handler invocation
pub type CommandResult = Result<Value, CommandError>;
