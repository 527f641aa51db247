//! Read-side transport port consumed by the aggregation and search services.

use crate::chat::domain::{
    Channel, ChannelId, DirectConversation, Guild, GuildId, MessageRecord,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Authenticated access to the chat platform.
///
/// Implementations own connection set-up, authentication, and rate-limit
/// handling. Callers must not assume any ordering of fetched messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Lists every direct conversation of the caller.
    async fn list_direct_conversations(&self) -> TransportResult<Vec<DirectConversation>>;

    /// Lists the guilds the caller belongs to.
    async fn list_guilds(&self) -> TransportResult<Vec<Guild>>;

    /// Lists the channels of a guild in platform order.
    async fn list_channels(&self, guild_id: &GuildId) -> TransportResult<Vec<Channel>>;

    /// Fetches at most `count` recent messages from a channel.
    async fn fetch_messages(
        &self,
        channel_id: &ChannelId,
        count: usize,
    ) -> TransportResult<Vec<MessageRecord>>;

    /// Runs a guild message search, returning the undecoded response body.
    async fn search_guild_messages(
        &self,
        guild_id: &GuildId,
        params: &[(&'static str, String)],
    ) -> TransportResult<Vec<u8>>;
}

/// Errors returned by transport adapters.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The platform answered with a non-success status.
    #[error("{endpoint} rejected with status {status}: {message}")]
    Rejected {
        /// Endpoint path that failed.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Platform-supplied reason.
        message: String,
    },

    /// The platform kept rate limiting after all retries.
    #[error("{endpoint} is rate limited (retry after {retry_after_secs}s)")]
    RateLimited {
        /// Endpoint path that failed.
        endpoint: String,
        /// Seconds the platform asked to wait.
        retry_after_secs: u64,
    },

    /// The response body could not be interpreted.
    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Endpoint path that failed.
        endpoint: String,
        /// Description of the problem.
        reason: String,
    },

    /// The configured API base URL cannot address endpoints.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Description of the problem.
        reason: String,
    },

    /// The request never completed.
    #[error("connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps a connection-level error.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Builds an [`TransportError::InvalidResponse`] for an endpoint.
    pub fn invalid_response(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}
