//! gable-protocol: Wire protocol for the Gable command socket
//!
//! This crate defines the messages exchanged between a command client and
//! the window-manager process: one `CallRequest` per invocation, answered
//! by exactly one `CallOutcome`. Messages travel as line-delimited JSON
//! over a local socket.

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode_line, encode_line};
pub use error::ProtocolError;
pub use message::{CallOutcome, CallRequest, Status};
