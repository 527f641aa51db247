//! In-memory chat platform for tests and offline demos.
//!
//! The transport is scripted up front with conversations, guilds, channels,
//! and messages, and can be told to fail specific calls. Every message fetch
//! and search request is recorded so tests can assert on scan order.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::chat::{
    domain::{
        Author, Channel, ChannelId, DirectConversation, ForumThread, Guild, GuildDetails, GuildId,
        MessageId, MessageRecord, Timestamp, UserId,
    },
    ports::{ChatActions, ChatTransport, TransportError, TransportResult},
};

const FIRST_GENERATED_ID: u64 = 900_000_000_000_000_000;

/// Thread-safe scripted chat platform.
#[derive(Clone)]
pub struct InMemoryChatTransport {
    state: Arc<RwLock<InMemoryChatState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

#[derive(Debug, Default)]
struct InMemoryChatState {
    caller: Option<Author>,
    direct_conversations: Vec<DirectConversation>,
    guilds: Vec<Guild>,
    guild_details: HashMap<GuildId, GuildDetails>,
    channels: HashMap<GuildId, Vec<Channel>>,
    messages: HashMap<ChannelId, Vec<MessageRecord>>,
    threads: HashMap<ChannelId, Vec<ForumThread>>,
    reactions: HashMap<MessageId, Vec<String>>,
    search_bodies: HashMap<GuildId, Vec<u8>>,
    failing_channels: HashSet<ChannelId>,
    failing_guilds: HashSet<GuildId>,
    fail_direct_listing: bool,
    fail_guild_listing: bool,
    fetch_log: Vec<(ChannelId, usize)>,
    search_log: Vec<(GuildId, Vec<(&'static str, String)>)>,
    generated_ids: u64,
}

impl std::fmt::Debug for InMemoryChatTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryChatTransport")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryChatTransport {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

fn lock_error(err: &dyn std::fmt::Display) -> TransportError {
    TransportError::connection(std::io::Error::other(err.to_string()))
}

fn not_found(endpoint: String, what: &str) -> TransportError {
    TransportError::Rejected {
        endpoint,
        status: 404,
        message: format!("Unknown {what}"),
    }
}

fn forbidden(endpoint: String) -> TransportError {
    TransportError::Rejected {
        endpoint,
        status: 403,
        message: "Missing Access".to_owned(),
    }
}

impl InMemoryChatTransport {
    /// Creates an empty platform using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty platform that stamps sent messages with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryChatState::default())),
            clock,
        }
    }

    fn read(&self) -> TransportResult<RwLockReadGuard<'_, InMemoryChatState>> {
        self.state.read().map_err(|err| lock_error(&err))
    }

    fn write(&self) -> TransportResult<RwLockWriteGuard<'_, InMemoryChatState>> {
        self.state.write().map_err(|err| lock_error(&err))
    }

    /// Sets the identity that authors sent messages.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn set_caller(&self, caller: Author) -> TransportResult<()> {
        self.write()?.caller = Some(caller);
        Ok(())
    }

    /// Appends a direct conversation to the listing.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn add_direct_conversation(&self, conversation: DirectConversation) -> TransportResult<()> {
        self.write()?.direct_conversations.push(conversation);
        Ok(())
    }

    /// Appends a guild and its channels, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn add_guild(&self, guild: Guild, channels: Vec<Channel>) -> TransportResult<()> {
        let mut state = self.write()?;
        state.channels.insert(guild.id().clone(), channels);
        state.guilds.push(guild);
        Ok(())
    }

    /// Stores detailed information returned for a guild lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn set_guild_details(&self, details: GuildDetails) -> TransportResult<()> {
        self.write()?
            .guild_details
            .insert(details.id.clone(), details);
        Ok(())
    }

    /// Appends messages to a channel's history.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn add_messages(
        &self,
        channel_id: &ChannelId,
        messages: impl IntoIterator<Item = MessageRecord>,
    ) -> TransportResult<()> {
        self.write()?
            .messages
            .entry(channel_id.clone())
            .or_default()
            .extend(messages);
        Ok(())
    }

    /// Appends a thread to a forum channel's archived listing.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn add_thread(&self, forum_id: &ChannelId, thread: ForumThread) -> TransportResult<()> {
        self.write()?
            .threads
            .entry(forum_id.clone())
            .or_default()
            .push(thread);
        Ok(())
    }

    /// Sets the raw body returned for searches of a guild.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn set_search_response(
        &self,
        guild_id: &GuildId,
        body: impl Into<Vec<u8>>,
    ) -> TransportResult<()> {
        self.write()?
            .search_bodies
            .insert(guild_id.clone(), body.into());
        Ok(())
    }

    /// Makes message fetches from a channel fail.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn fail_channel(&self, channel_id: &ChannelId) -> TransportResult<()> {
        self.write()?.failing_channels.insert(channel_id.clone());
        Ok(())
    }

    /// Makes channel listing for a guild fail.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn fail_guild_channels(&self, guild_id: &GuildId) -> TransportResult<()> {
        self.write()?.failing_guilds.insert(guild_id.clone());
        Ok(())
    }

    /// Makes listing direct conversations fail.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn fail_direct_listing(&self) -> TransportResult<()> {
        self.write()?.fail_direct_listing = true;
        Ok(())
    }

    /// Makes listing guilds fail.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn fail_guild_listing(&self) -> TransportResult<()> {
        self.write()?.fail_guild_listing = true;
        Ok(())
    }

    /// Returns every message fetch so far as `(channel, count)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn fetch_log(&self) -> TransportResult<Vec<(ChannelId, usize)>> {
        Ok(self.read()?.fetch_log.clone())
    }

    /// Returns every search request so far with its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn search_log(&self) -> TransportResult<Vec<(GuildId, Vec<(&'static str, String)>)>> {
        Ok(self.read()?.search_log.clone())
    }

    /// Returns a channel's stored history in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn messages_in(&self, channel_id: &ChannelId) -> TransportResult<Vec<MessageRecord>> {
        Ok(self
            .read()?
            .messages
            .get(channel_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Returns the caller's reactions on a message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connection`] when the state lock is poisoned.
    pub fn reactions_on(&self, message_id: &MessageId) -> TransportResult<Vec<String>> {
        Ok(self
            .read()?
            .reactions
            .get(message_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl InMemoryChatState {
    fn next_id(&mut self) -> String {
        self.generated_ids = self.generated_ids.saturating_add(1);
        FIRST_GENERATED_ID.saturating_add(self.generated_ids).to_string()
    }

    fn find_message_mut(
        &mut self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> Option<&mut MessageRecord> {
        self.messages
            .get_mut(channel_id)?
            .iter_mut()
            .find(|message| message.id() == message_id)
    }

    fn known_author(&self, user_id: &UserId) -> Option<Author> {
        self.messages
            .values()
            .flatten()
            .map(MessageRecord::author)
            .find(|author| author.id() == user_id)
            .cloned()
    }

    fn post(
        &mut self,
        channel_id: &ChannelId,
        content: &str,
        now: Timestamp,
    ) -> TransportResult<MessageRecord> {
        let endpoint = format!("/channels/{channel_id}/messages");
        let author = self
            .caller
            .clone()
            .ok_or_else(|| TransportError::Rejected {
                endpoint: endpoint.clone(),
                status: 401,
                message: "401: Unauthorized".to_owned(),
            })?;
        let id = MessageId::new(self.next_id())
            .map_err(|err| TransportError::invalid_response(endpoint, err))?;
        let record = MessageRecord::new(id, channel_id.clone(), author, content, now);
        self.messages
            .entry(channel_id.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ChatTransport for InMemoryChatTransport {
    async fn list_direct_conversations(&self) -> TransportResult<Vec<DirectConversation>> {
        let state = self.read()?;
        if state.fail_direct_listing {
            return Err(forbidden("/users/@me/channels".to_owned()));
        }
        Ok(state.direct_conversations.clone())
    }

    async fn list_guilds(&self) -> TransportResult<Vec<Guild>> {
        let state = self.read()?;
        if state.fail_guild_listing {
            return Err(forbidden("/users/@me/guilds".to_owned()));
        }
        Ok(state.guilds.clone())
    }

    async fn list_channels(&self, guild_id: &GuildId) -> TransportResult<Vec<Channel>> {
        let state = self.read()?;
        let endpoint = format!("/guilds/{guild_id}/channels");
        if state.failing_guilds.contains(guild_id) {
            return Err(forbidden(endpoint));
        }
        state
            .channels
            .get(guild_id)
            .cloned()
            .ok_or_else(|| not_found(endpoint, "Guild"))
    }

    async fn fetch_messages(
        &self,
        channel_id: &ChannelId,
        count: usize,
    ) -> TransportResult<Vec<MessageRecord>> {
        let mut state = self.write()?;
        state.fetch_log.push((channel_id.clone(), count));
        if state.failing_channels.contains(channel_id) {
            return Err(forbidden(format!("/channels/{channel_id}/messages")));
        }
        let mut history = state.messages.get(channel_id).cloned().unwrap_or_default();
        history.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        history.truncate(count);
        Ok(history)
    }

    async fn search_guild_messages(
        &self,
        guild_id: &GuildId,
        params: &[(&'static str, String)],
    ) -> TransportResult<Vec<u8>> {
        let mut state = self.write()?;
        state.search_log.push((guild_id.clone(), params.to_vec()));
        state
            .search_bodies
            .get(guild_id)
            .cloned()
            .ok_or_else(|| not_found(format!("/guilds/{guild_id}/messages/search"), "Guild"))
    }
}

#[async_trait]
impl ChatActions for InMemoryChatTransport {
    async fn guild_details(&self, guild_id: &GuildId) -> TransportResult<GuildDetails> {
        let state = self.read()?;
        if let Some(details) = state.guild_details.get(guild_id) {
            return Ok(details.clone());
        }
        state
            .guilds
            .iter()
            .find(|guild| guild.id() == guild_id)
            .map(|guild| GuildDetails {
                id: guild.id().clone(),
                name: guild.name().to_owned(),
                description: None,
                member_count: 0,
                owner_id: None,
            })
            .ok_or_else(|| not_found(format!("/guilds/{guild_id}"), "Guild"))
    }

    async fn fetch_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> TransportResult<MessageRecord> {
        let state = self.read()?;
        state
            .messages
            .get(channel_id)
            .and_then(|history| history.iter().find(|message| message.id() == message_id))
            .cloned()
            .ok_or_else(|| {
                not_found(format!("/channels/{channel_id}/messages/{message_id}"), "Message")
            })
    }

    async fn send_message(
        &self,
        channel_id: &ChannelId,
        content: &str,
    ) -> TransportResult<MessageRecord> {
        let now = Timestamp::from_datetime(self.clock.utc());
        self.write()?.post(channel_id, content, now)
    }

    async fn reply_to_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        content: &str,
    ) -> TransportResult<MessageRecord> {
        let now = Timestamp::from_datetime(self.clock.utc());
        let mut state = self.write()?;
        if state.find_message_mut(channel_id, message_id).is_none() {
            return Err(not_found(
                format!("/channels/{channel_id}/messages/{message_id}"),
                "Message",
            ));
        }
        state.post(channel_id, content, now)
    }

    async fn edit_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        content: &str,
    ) -> TransportResult<MessageRecord> {
        let mut state = self.write()?;
        let message = state.find_message_mut(channel_id, message_id).ok_or_else(|| {
            not_found(format!("/channels/{channel_id}/messages/{message_id}"), "Message")
        })?;
        let edited = MessageRecord::new(
            message.id().clone(),
            message.channel_id().clone(),
            message.author().clone(),
            content,
            message.timestamp(),
        );
        *message = edited.clone();
        Ok(edited)
    }

    async fn delete_message(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
    ) -> TransportResult<()> {
        let mut state = self.write()?;
        let endpoint = format!("/channels/{channel_id}/messages/{message_id}");
        let history = state
            .messages
            .get_mut(channel_id)
            .ok_or_else(|| not_found(endpoint.clone(), "Channel"))?;
        let before = history.len();
        history.retain(|message| message.id() != message_id);
        if history.len() == before {
            return Err(not_found(endpoint, "Message"));
        }
        state.reactions.remove(message_id);
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<()> {
        let mut state = self.write()?;
        if state.find_message_mut(channel_id, message_id).is_none() {
            return Err(not_found(
                format!("/channels/{channel_id}/messages/{message_id}/reactions"),
                "Message",
            ));
        }
        let reactions = state.reactions.entry(message_id.clone()).or_default();
        if !reactions.iter().any(|existing| existing == emoji) {
            reactions.push(emoji.to_owned());
        }
        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: &ChannelId,
        message_id: &MessageId,
        emoji: &str,
    ) -> TransportResult<()> {
        let mut state = self.write()?;
        if state.find_message_mut(channel_id, message_id).is_none() {
            return Err(not_found(
                format!("/channels/{channel_id}/messages/{message_id}/reactions"),
                "Message",
            ));
        }
        if let Some(reactions) = state.reactions.get_mut(message_id) {
            reactions.retain(|existing| existing != emoji);
        }
        Ok(())
    }

    async fn open_direct_conversation(&self, user_id: &UserId) -> TransportResult<ChannelId> {
        let mut state = self.write()?;
        let existing = state
            .direct_conversations
            .iter()
            .find(|conversation| conversation.peer().is_some_and(|peer| peer.id() == user_id))
            .map(|conversation| conversation.channel_id().clone());
        if let Some(channel_id) = existing {
            return Ok(channel_id);
        }

        let endpoint = "/users/@me/channels";
        let channel_id = ChannelId::new(state.next_id())
            .map_err(|err| TransportError::invalid_response(endpoint, err))?;
        let peer = state
            .known_author(user_id)
            .unwrap_or_else(|| Author::new(user_id.clone(), user_id.as_str(), false));
        state
            .direct_conversations
            .push(DirectConversation::new(channel_id.clone(), Some(peer)));
        Ok(channel_id)
    }

    async fn list_archived_threads(
        &self,
        channel_id: &ChannelId,
    ) -> TransportResult<Vec<ForumThread>> {
        Ok(self
            .read()?
            .threads
            .get(channel_id)
            .cloned()
            .unwrap_or_default())
    }
}
