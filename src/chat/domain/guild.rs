//! Guilds, their channels, and forum threads.

use super::{ChannelId, GuildId, MessageId, UserId};
use serde::{Serialize, Serializer};
use std::fmt;

/// A guild the caller belongs to, as returned by the membership listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guild {
    id: GuildId,
    name: String,
}

impl Guild {
    /// Creates a guild listing entry.
    #[must_use]
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the guild identifier.
    #[must_use]
    pub const fn id(&self) -> &GuildId {
        &self.id
    }

    /// Returns the guild display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Detailed guild information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildDetails {
    /// Guild identifier.
    pub id: GuildId,
    /// Guild display name.
    pub name: String,
    /// Guild description, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Approximate member count.
    pub member_count: u64,
    /// Owner of the guild.
    pub owner_id: Option<UserId>,
}

/// Kind of a guild or private channel.
///
/// Platform codes are stable integers; unknown codes are preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Guild text channel.
    Text,
    /// Direct conversation.
    Direct,
    /// Guild voice channel.
    Voice,
    /// Multi-party private conversation.
    GroupDirect,
    /// Channel category.
    Category,
    /// Announcement channel.
    News,
    /// Store channel.
    Store,
    /// Thread inside an announcement channel.
    NewsThread,
    /// Public thread.
    PublicThread,
    /// Private thread.
    PrivateThread,
    /// Stage voice channel.
    Stage,
    /// Forum channel.
    Forum,
    /// Any code this client does not know.
    Unknown(u8),
}

impl ChannelKind {
    /// Maps a platform channel type code to a kind.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Text,
            1 => Self::Direct,
            2 => Self::Voice,
            3 => Self::GroupDirect,
            4 => Self::Category,
            5 => Self::News,
            6 => Self::Store,
            10 => Self::NewsThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::Stage,
            15 => Self::Forum,
            other => Self::Unknown(other),
        }
    }

    /// Returns `true` for plain guild text channels.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Direct => "dm",
            Self::Voice => "voice",
            Self::GroupDirect => "group_dm",
            Self::Category => "category",
            Self::News => "news",
            Self::Store => "store",
            Self::NewsThread => "news_thread",
            Self::PublicThread => "public_thread",
            Self::PrivateThread => "private_thread",
            Self::Stage => "stage",
            Self::Forum => "forum",
            Self::Unknown(code) => return write!(f, "unknown_{code}"),
        };
        f.write_str(label)
    }
}

impl Serialize for ChannelKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A channel inside a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    id: ChannelId,
    name: String,
    #[serde(rename = "type")]
    kind: ChannelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<ChannelId>,
}

impl Channel {
    /// Creates a channel entry.
    #[must_use]
    pub fn new(id: ChannelId, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            topic: None,
            parent_id: None,
        }
    }

    /// Sets the channel topic.
    #[must_use]
    pub fn with_topic(mut self, topic: Option<String>) -> Self {
        self.topic = topic.filter(|value| !value.is_empty());
        self
    }

    /// Sets the parent category.
    #[must_use]
    pub fn with_parent(mut self, parent_id: Option<ChannelId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Returns the channel identifier.
    #[must_use]
    pub const fn id(&self) -> &ChannelId {
        &self.id
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the channel kind.
    #[must_use]
    pub const fn kind(&self) -> ChannelKind {
        self.kind
    }
}

/// A thread inside a forum channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumThread {
    /// Thread identifier.
    pub id: ChannelId,
    /// Thread title.
    pub name: String,
    /// Approximate number of messages in the thread.
    pub message_count: u64,
    /// Most recent message identifier, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<MessageId>,
    /// Whether the thread is archived.
    pub archived: bool,
}
