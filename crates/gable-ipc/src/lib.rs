//! gable-ipc: Command socket server and client
//!
//! The server side owns a listening Unix socket and a command registry
//! bound to the window-manager context; the client side presents remote
//! commands as local calls. One request line in, one outcome line out.

pub mod client;
pub mod server;

pub use client::CommandClient;
pub use server::CommandServer;
