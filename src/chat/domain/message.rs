//! Message records and their authors.

use super::{ChannelId, ChatDomainError, MessageId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Identity of a message sender as reported by the platform.
///
/// Authors are copied verbatim from transport responses and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    id: UserId,
    username: String,
    bot: bool,
}

impl Author {
    /// Creates an author value.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, bot: bool) -> Self {
        Self {
            id,
            username: username.into(),
            bot,
        }
    }

    /// Returns the author's stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the author's username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `true` when the author is an automated account.
    #[must_use]
    pub const fn is_bot(&self) -> bool {
        self.bot
    }

    /// Returns `true` when `name` matches the username, ignoring case.
    #[must_use]
    pub fn matches_username(&self, name: &str) -> bool {
        self.username.to_lowercase() == name.to_lowercase()
    }
}

/// A single chat message.
///
/// # Invariants
///
/// - `id` and `channel_id` are never empty (enforced by their types)
/// - the timestamp is a canonical UTC instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    id: MessageId,
    channel_id: ChannelId,
    author: Author,
    content: String,
    timestamp: Timestamp,
}

impl MessageRecord {
    /// Creates a message record.
    #[must_use]
    pub fn new(
        id: MessageId,
        channel_id: ChannelId,
        author: Author,
        content: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            channel_id,
            author,
            content: content.into(),
            timestamp,
        }
    }

    /// Builds a record from raw string fields.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError`] when an identifier is empty or the
    /// timestamp cannot be parsed.
    pub fn from_raw(raw: RawMessage<'_>) -> Result<Self, ChatDomainError> {
        let author = Author::new(UserId::new(raw.author_id)?, raw.author_username, raw.author_bot);
        Ok(Self::new(
            MessageId::new(raw.id)?,
            ChannelId::new(raw.channel_id)?,
            author,
            raw.content,
            Timestamp::parse(raw.timestamp)?,
        ))
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the channel the message was posted in.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Returns the message author.
    #[must_use]
    pub const fn author(&self) -> &Author {
        &self.author
    }

    /// Returns the message text, which may be empty.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was posted.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Borrowed string fields used to assemble a [`MessageRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMessage<'a> {
    /// Message identifier.
    pub id: &'a str,
    /// Channel identifier.
    pub channel_id: &'a str,
    /// Author identifier.
    pub author_id: &'a str,
    /// Author username.
    pub author_username: &'a str,
    /// Whether the author is automated.
    pub author_bot: bool,
    /// Message text.
    pub content: &'a str,
    /// RFC 3339 timestamp.
    pub timestamp: &'a str,
}
