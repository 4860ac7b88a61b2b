//! Request and response messages for the command socket
//!
//! A client sends one [`CallRequest`] per invocation and receives exactly
//! one [`CallOutcome`] back. Argument and payload values are opaque JSON
//! values; interpretation is left to the command implementations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// One command invocation: name plus positional and keyword arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Command name, resolved against the server's registry
    pub command: String,

    /// Positional arguments
    #[serde(default)]
    pub args: Vec<Value>,

    /// Keyword arguments
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl CallRequest {
    /// Create a request with the given arguments
    pub fn new(
        command: impl Into<String>,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Self {
        Self {
            command: command.into(),
            args,
            kwargs,
        }
    }
}

/// Outcome discriminator carried in every response
///
/// Transmitted as an integer: 0 = Success, 1 = Error, 2 = Exception.
/// Clients must branch on this value, never assume success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    /// The command ran to completion; payload is its return value
    Success,
    /// The command signaled an expected, user-facing failure; payload is a message
    Error,
    /// The command failed unexpectedly; payload is a diagnostic trace
    Exception,
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        match status {
            Status::Success => 0,
            Status::Error => 1,
            Status::Exception => 2,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Status::Success),
            1 => Ok(Status::Error),
            2 => Ok(Status::Exception),
            other => Err(ProtocolError::UnknownStatus(other)),
        }
    }
}

/// The (status, payload) result of one command invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Outcome kind
    pub status: Status,
    /// Return value, failure message, or diagnostic trace depending on status
    pub payload: Value,
}

impl CallOutcome {
    /// Successful invocation with a return value
    pub fn success(payload: Value) -> Self {
        Self {
            status: Status::Success,
            payload,
        }
    }

    /// Expected, user-facing failure
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            payload: Value::String(message.into()),
        }
    }

    /// Unexpected internal failure with a diagnostic trace
    pub fn exception(trace: impl Into<String>) -> Self {
        Self {
            status: Status::Exception,
            payload: Value::String(trace.into()),
        }
    }
}
