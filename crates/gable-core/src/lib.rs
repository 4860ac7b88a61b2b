//! gable-core: Command registry and dispatch for the Gable window manager
//!
//! This crate holds the transport-free half of the command layer: the
//! registry that maps command names to handlers, the dispatch boundary that
//! turns one invocation into one (status, payload) outcome, deferred call
//! specifications for key bindings and scripting, and the socket path
//! convention shared by server and client.

pub mod call;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod socket;

pub use call::CallSpec;
pub use dispatch::handle_call;
pub use error::{CommandError, CommandResult};
pub use registry::{Command, CommandIndex, CommandRegistry, CommandSignature, Param};
pub use socket::{default_socket_path, socket_path_in, SOCKET_PREFIX};
