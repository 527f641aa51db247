//! Direct messaging addressed by user reference.

use super::identity::{IdentityError, IdentityResolver, ResolvedUser};
use crate::chat::{
    domain::{MessageRecord, UserReference},
    ports::{ChatActions, ChatTransport, TransportError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`DirectMessageService`].
#[derive(Debug, Clone, Error)]
pub enum DirectMessageError {
    /// The recipient could not be resolved.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A platform call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for direct messaging.
pub type DirectMessageResult<T> = Result<T, DirectMessageError>;

/// Reads and writes direct conversations with a named or numbered user.
#[derive(Clone)]
pub struct DirectMessageService<T>
where
    T: ChatTransport + ChatActions,
{
    transport: Arc<T>,
    resolver: IdentityResolver<T>,
}

impl<T> DirectMessageService<T>
where
    T: ChatTransport + ChatActions,
{
    /// Creates a service sharing one transport with its resolver.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        let resolver = IdentityResolver::new(Arc::clone(&transport));
        Self {
            transport,
            resolver,
        }
    }

    /// Resolves the recipient without contacting them.
    ///
    /// # Errors
    ///
    /// Returns [`DirectMessageError::Identity`] when resolution fails.
    pub async fn resolve(&self, reference: &UserReference) -> DirectMessageResult<ResolvedUser> {
        Ok(self.resolver.resolve(reference).await?)
    }

    /// Returns up to `limit` recent messages exchanged with a user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectMessageError`] when resolution, opening the
    /// conversation, or fetching fails.
    pub async fn history(
        &self,
        reference: &UserReference,
        limit: usize,
    ) -> DirectMessageResult<Vec<MessageRecord>> {
        let recipient = self.resolve(reference).await?;
        let channel_id = self.transport.open_direct_conversation(&recipient.id).await?;
        Ok(self.transport.fetch_messages(&channel_id, limit).await?)
    }

    /// Sends `content` to an already resolved recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DirectMessageError::Transport`] when opening the
    /// conversation or posting fails.
    pub async fn send(
        &self,
        recipient: &ResolvedUser,
        content: &str,
    ) -> DirectMessageResult<MessageRecord> {
        let channel_id = self.transport.open_direct_conversation(&recipient.id).await?;
        tracing::info!(recipient = recipient.label(), "sending direct message");
        Ok(self.transport.send_message(&channel_id, content).await?)
    }
}
