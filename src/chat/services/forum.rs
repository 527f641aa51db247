//! Forum thread listing.

use crate::chat::{
    domain::{ChannelId, ForumThread, MessageRecord},
    ports::{ChatActions, ChatTransport, TransportResult},
};
use std::sync::Arc;

/// Lists forum threads and reads their messages.
#[derive(Clone)]
pub struct ForumService<T>
where
    T: ChatTransport + ChatActions,
{
    transport: Arc<T>,
}

impl<T> ForumService<T>
where
    T: ChatTransport + ChatActions,
{
    /// Creates a forum service.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Lists threads of a forum channel.
    ///
    /// Only archived public threads are listable with a user token, so with
    /// `active_only` the result is usually empty. `limit == 0` means
    /// unbounded.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the listing fails.
    pub async fn threads(
        &self,
        forum_id: &ChannelId,
        limit: usize,
        active_only: bool,
    ) -> TransportResult<Vec<ForumThread>> {
        let threads = self.transport.list_archived_threads(forum_id).await?;
        let bound = if limit == 0 { usize::MAX } else { limit };
        Ok(threads
            .into_iter()
            .filter(|thread| !active_only || !thread.archived)
            .take(bound)
            .collect())
    }

    /// Returns up to `limit` recent messages of a thread.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the fetch fails.
    pub async fn thread_messages(
        &self,
        thread_id: &ChannelId,
        limit: usize,
    ) -> TransportResult<Vec<MessageRecord>> {
        self.transport.fetch_messages(thread_id, limit).await
    }
}
