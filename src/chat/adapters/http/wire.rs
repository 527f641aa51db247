//! JSON shapes returned by the platform's REST API.

use serde::Deserialize;

use crate::chat::domain::{
    Author, Channel, ChannelId, ChannelKind, ChatDomainError, DirectConversation, ForumThread,
    Guild, GuildDetails, GuildId, MessageId, MessageRecord, RawMessage, UserId,
};

#[derive(Debug, Deserialize)]
pub(super) struct WireUser {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    bot: bool,
}

impl WireUser {
    pub(super) fn into_author(self) -> Result<Author, ChatDomainError> {
        Ok(Author::new(UserId::new(self.id)?, self.username, self.bot))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WireMessage {
    id: String,
    channel_id: String,
    author: WireUser,
    #[serde(default)]
    content: String,
    timestamp: String,
}

impl WireMessage {
    pub(super) fn into_record(self) -> Result<MessageRecord, ChatDomainError> {
        MessageRecord::from_raw(RawMessage {
            id: &self.id,
            channel_id: &self.channel_id,
            author_id: &self.author.id,
            author_username: &self.author.username,
            author_bot: self.author.bot,
            content: &self.content,
            timestamp: &self.timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireThreadMetadata {
    #[serde(default)]
    archived: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireChannel {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    name: Option<String>,
    topic: Option<String>,
    parent_id: Option<String>,
    #[serde(default)]
    recipients: Vec<WireUser>,
    last_message_id: Option<String>,
    message_count: Option<u64>,
    thread_metadata: Option<WireThreadMetadata>,
}

impl WireChannel {
    /// Returns the conversation for one-to-one direct channels and `None`
    /// for every other channel kind.
    pub(super) fn into_direct_conversation(
        self,
    ) -> Result<Option<DirectConversation>, ChatDomainError> {
        if ChannelKind::from_code(self.kind) != ChannelKind::Direct {
            return Ok(None);
        }
        let peer = self
            .recipients
            .into_iter()
            .next()
            .map(WireUser::into_author)
            .transpose()?;
        Ok(Some(DirectConversation::new(ChannelId::new(self.id)?, peer)))
    }

    pub(super) fn into_channel(self) -> Result<Channel, ChatDomainError> {
        let parent = self.parent_id.map(ChannelId::new).transpose()?;
        Ok(Channel::new(
            ChannelId::new(self.id)?,
            self.name.unwrap_or_default(),
            ChannelKind::from_code(self.kind),
        )
        .with_topic(self.topic)
        .with_parent(parent))
    }

    pub(super) fn into_thread(self) -> Result<ForumThread, ChatDomainError> {
        Ok(ForumThread {
            id: ChannelId::new(self.id)?,
            name: self.name.unwrap_or_default(),
            message_count: self.message_count.unwrap_or_default(),
            last_message_id: self.last_message_id.map(MessageId::new).transpose()?,
            archived: self
                .thread_metadata
                .is_some_and(|metadata| metadata.archived),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WireGuild {
    id: String,
    #[serde(default)]
    name: String,
    description: Option<String>,
    approximate_member_count: Option<u64>,
    owner_id: Option<String>,
}

impl WireGuild {
    pub(super) fn into_guild(self) -> Result<Guild, ChatDomainError> {
        Ok(Guild::new(GuildId::new(self.id)?, self.name))
    }

    pub(super) fn into_details(self) -> Result<GuildDetails, ChatDomainError> {
        Ok(GuildDetails {
            id: GuildId::new(self.id)?,
            name: self.name,
            description: self.description.filter(|text| !text.is_empty()),
            member_count: self.approximate_member_count.unwrap_or_default(),
            owner_id: self.owner_id.map(UserId::new).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WireThreadList {
    #[serde(default)]
    pub threads: Vec<WireChannel>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireRateLimit {
    pub retry_after: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireErrorBody {
    pub message: String,
}
