//! Shared builders for the in-memory platform integration tests.

use dca::chat::{
    adapters::InMemoryChatTransport,
    domain::{
        Author, Channel, ChannelId, ChannelKind, DirectConversation, Guild, GuildId, MessageId,
        MessageRecord, Timestamp, UserId,
    },
};
use rstest::fixture;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Boxed error returned by fallible tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Builds an author with the bot flag cleared.
///
/// # Errors
///
/// Returns an error when `id` is blank.
pub fn author(id: &str, username: &str) -> TestResult<Author> {
    Ok(Author::new(UserId::new(id)?, username, false))
}

/// Builds a message posted by `sender` at `timestamp`.
///
/// # Errors
///
/// Returns an error when an identifier or the timestamp is invalid.
pub fn message(
    id: &str,
    channel: &str,
    sender: &Author,
    content: &str,
    timestamp: &str,
) -> TestResult<MessageRecord> {
    Ok(MessageRecord::new(
        MessageId::new(id)?,
        ChannelId::new(channel)?,
        sender.clone(),
        content,
        Timestamp::parse(timestamp)?,
    ))
}

/// Scripts a platform with three direct conversations and one guild.
///
/// - `11` with alice: two messages, the newest at 10:05
/// - `12` with bob: one message at 09:00
/// - `13` with carol: no messages
/// - guild `500` with text channels `501` and `503` around voice channel
///   `502`; only `501` has a message, at 10:10
///
/// The caller is `me` (`100`).
///
/// # Errors
///
/// Returns an error when the platform cannot be scripted.
pub fn scripted_platform() -> TestResult<Arc<InMemoryChatTransport>> {
    let platform = InMemoryChatTransport::new();
    let me = author("100", "me")?;
    let alice = author("1", "alice")?;
    let bob = author("2", "bob")?;
    let carol = author("3", "carol")?;
    let dave = author("4", "dave")?;
    platform.set_caller(me.clone())?;

    for (channel, peer) in [("11", &alice), ("12", &bob), ("13", &carol)] {
        platform.add_direct_conversation(DirectConversation::new(
            ChannelId::new(channel)?,
            Some(peer.clone()),
        ))?;
    }
    platform.add_messages(
        &ChannelId::new("11")?,
        [
            message("1001", "11", &alice, "hi from alice", "2024-03-01T10:00:00Z")?,
            message("1002", "11", &me, "hey alice", "2024-03-01T10:05:00Z")?,
        ],
    )?;
    platform.add_messages(
        &ChannelId::new("12")?,
        [message("1003", "12", &bob, "old news", "2024-03-01T09:00:00Z")?],
    )?;

    platform.add_guild(
        Guild::new(GuildId::new("500")?, "Rustaceans"),
        vec![
            Channel::new(ChannelId::new("501")?, "general", ChannelKind::Text),
            Channel::new(ChannelId::new("502")?, "lounge", ChannelKind::Voice),
            Channel::new(ChannelId::new("503")?, "random", ChannelKind::Text),
        ],
    )?;
    platform.add_messages(
        &ChannelId::new("501")?,
        [message("1004", "501", &dave, "guild chatter", "2024-03-01T10:10:00Z")?],
    )?;
    Ok(Arc::new(platform))
}

/// Collects message contents in order.
#[must_use]
pub fn contents<'a>(messages: impl IntoIterator<Item = &'a MessageRecord>) -> Vec<String> {
    messages
        .into_iter()
        .map(|message| message.content().to_owned())
        .collect()
}
