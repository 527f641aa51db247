//! REST adapter for the hosted chat platform.

mod client;
mod wire;

pub use client::{
    DEFAULT_API_BASE_URL, DEFAULT_MESSAGE_PAGE, DEFAULT_REQUEST_TIMEOUT, HttpChatTransport,
    HttpTransportConfig, MAX_ATTEMPTS, MAX_MESSAGE_PAGE, MAX_RETRY_AFTER, clamp_message_page,
};
