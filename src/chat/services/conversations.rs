//! Direct conversation listing ordered by recency.

use super::fan_out::fetch_all;
use crate::chat::{
    domain::{ConversationSummary, MessageRecord},
    ports::{ChatTransport, TransportResult},
};
use std::sync::Arc;

/// Fetches allowed in flight while sampling last messages.
pub const CONVERSATION_MAX_IN_FLIGHT: usize = 4;

/// Lists direct conversations with their most recent message.
#[derive(Clone)]
pub struct ConversationEnumerator<T>
where
    T: ChatTransport,
{
    transport: Arc<T>,
    max_in_flight: usize,
}

impl<T> ConversationEnumerator<T>
where
    T: ChatTransport,
{
    /// Creates an enumerator over the given transport.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            max_in_flight: CONVERSATION_MAX_IN_FLIGHT,
        }
    }

    /// Returns conversation summaries, most recently active first.
    ///
    /// Conversations whose last message could not be fetched sort after every
    /// conversation with a known message, keeping their listing order. With
    /// `active_only` they are dropped instead. `limit == 0` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns the transport error when direct conversations cannot be
    /// listed.
    pub async fn list(
        &self,
        limit: usize,
        active_only: bool,
    ) -> TransportResult<Vec<ConversationSummary>> {
        let conversations = self.transport.list_direct_conversations().await?;
        let targets = conversations
            .into_iter()
            .map(|conversation| (conversation.channel_id().clone(), conversation))
            .collect();
        let fetched = fetch_all(&*self.transport, targets, 1, self.max_in_flight).await;

        let mut summaries: Vec<ConversationSummary> = fetched
            .into_iter()
            .map(|item| {
                let (conversation, _, messages) = item.settle();
                let last = messages.into_iter().max_by_key(MessageRecord::timestamp);
                ConversationSummary::new(conversation, last)
            })
            .filter(|summary| !active_only || summary.last_message().is_some())
            .collect();

        // `None` orders below every `Some`, so unknown activity lands last.
        summaries.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
        if limit > 0 {
            summaries.truncate(limit);
        }
        Ok(summaries)
    }
}
