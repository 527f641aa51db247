//! Single-call platform operations used by the command surface.
//!
//! These are direct wrappers over platform endpoints with no aggregation
//! logic; they share [`TransportError`] with the read-side port.

use super::transport::TransportResult;
use crate::chat::domain::{
    ChannelId, ForumThread, GuildDetails, GuildId, MessageId, MessageRecord, UserId,
};
use async_trait::async_trait;

/// Mutating and lookup operations on individual platform objects.
#[async_trait]
pub trait ChatActions: Send + Sync {
    /// Fetches detailed information about a guild.
    async fn guild_details(&self, guild_id: &GuildId) -> TransportResult<GuildDetails>;

    /// Fetches one message.
    async fn fetch_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> TransportResult<MessageRecord>;

    /// Posts a message to a channel.
    async fn send_message(
        &self,
        channel_id: &ChannelId,
        content: &str,
    ) -> TransportResult<MessageRecord>;

    /// Posts a reply referencing an existing message.
    async fn reply_to_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        content: &str,
    ) -> TransportResult<MessageRecord>;

    /// Replaces the content of one of the caller's messages.
    async fn edit_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        content: &str,
    ) -> TransportResult<MessageRecord>;

    /// Deletes one of the caller's messages.
    async fn delete_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> TransportResult<()>;

    /// Adds the caller's reaction to a message.
    async fn add_reaction(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<()>;

    /// Removes the caller's reaction from a message.
    async fn remove_reaction(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<()>;

    /// Opens (or reuses) the direct conversation with a user.
    async fn open_direct_conversation(&self, user_id: &UserId) -> TransportResult<ChannelId>;

    /// Lists archived public threads of a forum channel.
    ///
    /// User tokens cannot list active threads, so archived public threads are
    /// the only listing available.
    async fn list_archived_threads(&self, channel_id: &ChannelId)
    -> TransportResult<Vec<ForumThread>>;
}
