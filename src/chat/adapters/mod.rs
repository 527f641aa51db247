//! Adapter implementations of the chat ports.

pub mod http;
pub mod memory;

pub use http::{HttpChatTransport, HttpTransportConfig};
pub use memory::InMemoryChatTransport;
