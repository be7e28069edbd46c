//! Transport layer: the chat server's HTTP endpoints and its Socket.IO channel.

pub mod error;
pub mod history;
pub mod http;
pub mod protocol;
pub mod roster;
pub mod socket;

/// Returns the transport module name for smoke checks.
pub fn module_name() -> &'static str {
    "transport"
}
