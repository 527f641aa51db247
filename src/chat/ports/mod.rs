//! Port contracts for the chat platform.
//!
//! Ports define infrastructure-agnostic interfaces used by the chat services.

pub mod actions;
pub mod transport;

pub use actions::ChatActions;
pub use transport::{ChatTransport, TransportError, TransportResult};
