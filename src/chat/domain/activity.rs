//! Activity records: messages tagged with the container they came from.

use super::{Author, ChatDomainError, GuildId, MessageRecord, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an activity record was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// A private direct conversation.
    #[serde(rename = "dm")]
    Direct,
    /// A channel inside a guild.
    #[serde(rename = "server")]
    Group,
}

/// Provenance of an activity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivitySource {
    /// Collected from a direct conversation with `peer`.
    Direct {
        /// The other party of the conversation, when the platform reports one.
        peer: Option<Author>,
    },
    /// Collected from a guild channel.
    Group {
        /// Guild identifier.
        guild_id: GuildId,
        /// Guild display name.
        guild_name: String,
        /// Channel display name.
        channel_name: String,
    },
}

impl ActivitySource {
    /// Returns the coarse source kind.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Direct { .. } => SourceKind::Direct,
            Self::Group { .. } => SourceKind::Group,
        }
    }
}

/// A message plus provenance, produced transiently by activity aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    message: MessageRecord,
    source: ActivitySource,
}

impl ActivityRecord {
    /// Tags a message with its source.
    #[must_use]
    pub const fn new(message: MessageRecord, source: ActivitySource) -> Self {
        Self { message, source }
    }

    /// Returns the underlying message.
    #[must_use]
    pub const fn message(&self) -> &MessageRecord {
        &self.message
    }

    /// Returns the record's provenance.
    #[must_use]
    pub const fn source(&self) -> &ActivitySource {
        &self.source
    }

    /// Returns the coarse source kind.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Returns when the underlying message was posted.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.message.timestamp()
    }
}

#[derive(Serialize)]
struct ActivityRecordView<'a> {
    #[serde(flatten)]
    message: &'a MessageRecord,
    #[serde(rename = "type")]
    kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    server_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server_id: Option<&'a GuildId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dm_user: Option<&'a Author>,
}

impl Serialize for ActivityRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match &self.source {
            ActivitySource::Direct { peer } => ActivityRecordView {
                message: &self.message,
                kind: SourceKind::Direct,
                server_name: None,
                server_id: None,
                channel_name: None,
                dm_user: peer.as_ref(),
            },
            ActivitySource::Group {
                guild_id,
                guild_name,
                channel_name,
            } => ActivityRecordView {
                message: &self.message,
                kind: SourceKind::Group,
                server_name: Some(guild_name),
                server_id: Some(guild_id),
                channel_name: Some(channel_name),
                dm_user: None,
            },
        };
        view.serialize(serializer)
    }
}

/// Which containers an activity query inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityFilter {
    /// Direct conversations and guild channels.
    #[default]
    All,
    /// Direct conversations only.
    Direct,
    /// Guild channels only.
    Group,
}

impl ActivityFilter {
    /// Returns `true` when direct conversations are inspected.
    #[must_use]
    pub const fn includes_direct(self) -> bool {
        matches!(self, Self::All | Self::Direct)
    }

    /// Returns `true` when guild channels are inspected.
    #[must_use]
    pub const fn includes_groups(self) -> bool {
        matches!(self, Self::All | Self::Group)
    }
}

impl FromStr for ActivityFilter {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "dm" | "direct" => Ok(Self::Direct),
            "server" | "group" | "guild" => Ok(Self::Group),
            _ => Err(ChatDomainError::UnknownActivityFilter(s.to_owned())),
        }
    }
}

impl fmt::Display for ActivityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Direct => "dm",
            Self::Group => "server",
        })
    }
}
