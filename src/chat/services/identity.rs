//! Username to user identifier resolution by bounded message scanning.
//!
//! The platform offers no lookup from a username to a user identifier for
//! ordinary accounts, so the resolver inspects recent message authors: first
//! in direct conversations, then in the first few text channels of each
//! guild. The scan is sequential and stops at the first match.

use crate::chat::{
    domain::{Author, ChannelId, UserId, UserReference},
    ports::{ChatTransport, TransportError},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Messages inspected per direct conversation or guild channel.
pub const IDENTITY_MESSAGES_PER_CONTAINER: usize = 20;

/// Text channels inspected per guild.
pub const IDENTITY_CHANNELS_PER_GUILD: usize = 5;

/// Limits on how much history a resolution may scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanBounds {
    /// Messages fetched per container.
    pub messages_per_container: usize,
    /// Text channels inspected per guild.
    pub channels_per_guild: usize,
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self {
            messages_per_container: IDENTITY_MESSAGES_PER_CONTAINER,
            channels_per_guild: IDENTITY_CHANNELS_PER_GUILD,
        }
    }
}

/// Errors returned while resolving a user.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// No scanned message was written by the named user.
    #[error("user '{username}' not found in recent messages")]
    NotFound {
        /// Username that was searched for.
        username: String,
    },

    /// The username was blank.
    #[error("username must not be empty")]
    EmptyUsername,

    /// A listing the scan depends on failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for identity resolution.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// A user reference after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUser {
    /// Resolved identifier.
    pub id: UserId,
    /// Matching author, present when the reference was a username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

impl ResolvedUser {
    /// Returns a human-readable label: the username when known, else the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.author
            .as_ref()
            .map_or_else(|| self.id.as_str(), Author::username)
    }
}

/// Maps usernames to user identifiers.
#[derive(Clone)]
pub struct IdentityResolver<T>
where
    T: ChatTransport,
{
    transport: Arc<T>,
    bounds: ScanBounds,
}

impl<T> IdentityResolver<T>
where
    T: ChatTransport,
{
    /// Creates a resolver with default scan bounds.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_bounds(transport, ScanBounds::default())
    }

    /// Creates a resolver with explicit scan bounds.
    #[must_use]
    pub const fn with_bounds(transport: Arc<T>, bounds: ScanBounds) -> Self {
        Self { transport, bounds }
    }

    /// Resolves a reference, scanning only when it is a username.
    ///
    /// # Errors
    ///
    /// See [`IdentityResolver::resolve_username`].
    pub async fn resolve(&self, reference: &UserReference) -> IdentityResult<ResolvedUser> {
        match reference {
            UserReference::Id(id) => Ok(ResolvedUser {
                id: id.clone(),
                author: None,
            }),
            UserReference::Username(name) => {
                let author = self.resolve_username(name).await?;
                Ok(ResolvedUser {
                    id: author.id().clone(),
                    author: Some(author),
                })
            }
        }
    }

    /// Finds the first scanned author whose username matches `username`,
    /// ignoring case. Surrounding whitespace is part of the name; command-line
    /// references are trimmed when parsed into a [`UserReference`].
    ///
    /// Direct conversations are scanned in listing order before guilds, and
    /// messages within a channel in the order the transport returns them.
    /// Failures fetching a single channel, or listing one guild's channels,
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::EmptyUsername`] for a blank name,
    /// [`IdentityError::Transport`] when direct conversations or guilds
    /// cannot be listed, and [`IdentityError::NotFound`] when the scan ends
    /// without a match.
    pub async fn resolve_username(&self, username: &str) -> IdentityResult<Author> {
        if username.trim().is_empty() {
            return Err(IdentityError::EmptyUsername);
        }

        tracing::info!(username, "searching direct conversations");
        let conversations = self.transport.list_direct_conversations().await?;
        for conversation in &conversations {
            if let Some(author) = self.scan_channel(conversation.channel_id(), username).await {
                return Ok(author);
            }
        }

        let guilds = self.transport.list_guilds().await?;
        tracing::info!(username, guilds = guilds.len(), "searching guilds");
        for (index, guild) in guilds.iter().enumerate() {
            tracing::info!(
                progress = format_args!("{}/{}", index.saturating_add(1), guilds.len()),
                guild = guild.name(),
                "scanning guild"
            );
            let channels = match self.transport.list_channels(guild.id()).await {
                Ok(channels) => channels,
                Err(err) => {
                    tracing::debug!(guild_id = %guild.id(), error = %err, "skipping guild");
                    continue;
                }
            };
            let text_channels = channels
                .iter()
                .filter(|channel| channel.kind().is_text())
                .take(self.bounds.channels_per_guild);
            for channel in text_channels {
                if let Some(author) = self.scan_channel(channel.id(), username).await {
                    return Ok(author);
                }
            }
        }

        Err(IdentityError::NotFound {
            username: username.to_owned(),
        })
    }

    async fn scan_channel(&self, channel_id: &ChannelId, wanted: &str) -> Option<Author> {
        match self
            .transport
            .fetch_messages(channel_id, self.bounds.messages_per_container)
            .await
        {
            Ok(messages) => messages
                .iter()
                .find(|message| message.author().matches_username(wanted))
                .map(|message| message.author().clone()),
            Err(err) => {
                tracing::debug!(channel_id = %channel_id, error = %err, "skipping channel");
                None
            }
        }
    }
}
