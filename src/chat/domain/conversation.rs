//! Direct conversations and their recency summaries.

use super::{Author, ChannelId, MessageRecord, Timestamp};
use serde::Serialize;

/// A direct conversation container as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectConversation {
    channel_id: ChannelId,
    peer: Option<Author>,
}

impl DirectConversation {
    /// Creates a direct conversation entry.
    #[must_use]
    pub const fn new(channel_id: ChannelId, peer: Option<Author>) -> Self {
        Self { channel_id, peer }
    }

    /// Returns the conversation's channel identifier.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Returns the other participant, when the platform reports one.
    #[must_use]
    pub const fn peer(&self) -> Option<&Author> {
        self.peer.as_ref()
    }
}

/// A direct conversation plus its most recent message.
///
/// # Invariants
///
/// Summaries without a last message never appear in an "active only"
/// listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    channel_id: ChannelId,
    #[serde(rename = "user", skip_serializing_if = "Option::is_none")]
    peer: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_message: Option<MessageRecord>,
}

impl ConversationSummary {
    /// Summarises a conversation with an optional most recent message.
    #[must_use]
    pub fn new(conversation: DirectConversation, last_message: Option<MessageRecord>) -> Self {
        let DirectConversation { channel_id, peer } = conversation;
        Self {
            channel_id,
            peer,
            last_message,
        }
    }

    /// Returns the conversation's channel identifier.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Returns the other participant, when known.
    #[must_use]
    pub const fn peer(&self) -> Option<&Author> {
        self.peer.as_ref()
    }

    /// Returns the most recent message, when one could be fetched.
    #[must_use]
    pub const fn last_message(&self) -> Option<&MessageRecord> {
        self.last_message.as_ref()
    }

    /// Returns the timestamp of the most recent message.
    #[must_use]
    pub fn last_activity(&self) -> Option<Timestamp> {
        self.last_message.as_ref().map(MessageRecord::timestamp)
    }
}
