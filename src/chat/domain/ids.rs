//! Platform identifier newtypes.
//!
//! The chat platform assigns opaque snowflake strings to users, channels,
//! guilds, and messages. Wrapping each kind in its own type prevents a channel
//! identifier from being passed where a guild identifier is expected, and
//! guarantees the value is never empty.

use super::ChatDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn normalize(kind: &'static str, value: String) -> Result<String, ChatDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChatDomainError::EmptyIdentifier(kind));
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Identifier of a platform user.
///
/// # Examples
///
/// ```
/// use dca::chat::domain::UserId;
///
/// let id = UserId::new("80351110224678912").expect("valid id");
/// assert!(id.is_snowflake());
/// assert!(UserId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        normalize("user", value.into()).map(Self)
    }

    /// Returns `true` when the identifier consists only of ASCII digits.
    #[must_use]
    pub fn is_snowflake(&self) -> bool {
        self.0.chars().all(|c| c.is_ascii_digit())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a channel: a guild channel, a thread, or a direct
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Creates a channel identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        normalize("channel", value.into()).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a guild (server).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GuildId(String);

impl GuildId {
    /// Creates a guild identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        normalize("guild", value.into()).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Creates a message identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptyIdentifier`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ChatDomainError> {
        normalize("message", value.into()).map(Self)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ChatDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = ChatDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for GuildId {
    type Error = ChatDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for MessageId {
    type Error = ChatDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for UserId {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for ChannelId {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for GuildId {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for MessageId {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl From<ChannelId> for String {
    fn from(value: ChannelId) -> Self {
        value.0
    }
}

impl From<GuildId> for String {
    fn from(value: GuildId) -> Self {
        value.0
    }
}

impl From<MessageId> for String {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for GuildId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
