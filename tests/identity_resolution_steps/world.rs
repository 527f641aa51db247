//! Shared world state for identity resolution BDD scenarios.

use dca::chat::{
    adapters::InMemoryChatTransport,
    domain::{
        Author, Channel, ChannelId, ChannelKind, Guild, GuildId, MessageId, MessageRecord,
        Timestamp, UserId,
    },
    services::{IdentityResolver, IdentityResult, ResolvedUser, ScanBounds},
};
use rstest::fixture;
use std::sync::Arc;

const POSTED_AT: &str = "2024-03-01T10:00:00Z";

/// Scenario world for identity resolution behaviour tests.
pub struct IdentityWorld {
    /// The scripted platform under test.
    pub platform: Arc<InMemoryChatTransport>,
    /// Scan limits applied when the resolver is built.
    pub bounds: ScanBounds,
    /// Guild channels declared so far, installed before resolving.
    pub guild_channels: Vec<(GuildId, Channel)>,
    /// Direct conversation channels declared so far.
    pub direct_channels: Vec<ChannelId>,
    /// Result of the last resolution.
    pub last_result: Option<IdentityResult<ResolvedUser>>,
    next_message: u64,
}

impl IdentityWorld {
    /// Creates a world with an empty platform and default scan bounds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: Arc::new(InMemoryChatTransport::new()),
            bounds: ScanBounds::default(),
            guild_channels: Vec::new(),
            direct_channels: Vec::new(),
            last_result: None,
            next_message: 1000,
        }
    }

    /// Posts one message by `author` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error when the message cannot be stored.
    pub fn post(&mut self, channel: &ChannelId, author: &Author) -> eyre::Result<()> {
        self.next_message = self.next_message.saturating_add(1);
        let record = MessageRecord::new(
            MessageId::new(self.next_message.to_string())?,
            channel.clone(),
            author.clone(),
            "hello",
            Timestamp::parse(POSTED_AT)?,
        );
        self.platform.add_messages(channel, [record])?;
        Ok(())
    }

    /// Registers the declared guilds with the platform, keeping declaration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform cannot be scripted.
    pub fn install_guilds(&mut self) -> eyre::Result<()> {
        let mut grouped: Vec<(GuildId, Vec<Channel>)> = Vec::new();
        for (guild_id, channel) in self.guild_channels.drain(..) {
            match grouped.iter_mut().find(|(id, _)| *id == guild_id) {
                Some((_, channels)) => channels.push(channel),
                None => grouped.push((guild_id, vec![channel])),
            }
        }
        for (guild_id, channels) in grouped {
            let name = format!("guild {guild_id}");
            self.platform.add_guild(Guild::new(guild_id, name), channels)?;
        }
        Ok(())
    }

    /// Builds a resolver over the platform with the scenario's bounds.
    #[must_use]
    pub fn resolver(&self) -> IdentityResolver<InMemoryChatTransport> {
        IdentityResolver::with_bounds(Arc::clone(&self.platform), self.bounds)
    }
}

impl Default for IdentityWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IdentityWorld {
    IdentityWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a guild text channel.
///
/// # Errors
///
/// Returns an error when `id` is blank.
pub fn text_channel(id: &str) -> eyre::Result<Channel> {
    Ok(Channel::new(ChannelId::new(id)?, format!("channel-{id}"), ChannelKind::Text))
}

/// Builds a human author.
///
/// # Errors
///
/// Returns an error when `id` is blank.
pub fn author(id: &str, username: &str) -> eyre::Result<Author> {
    Ok(Author::new(UserId::new(id)?, username, false))
}
