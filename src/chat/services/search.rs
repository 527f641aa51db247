//! Guild message search: response decoding and the search service.

use crate::chat::{
    domain::{GuildId, MessageRecord, RawMessage, SearchQuery, SearchResult},
    ports::{ChatTransport, TransportError},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`decode_search_response`].
#[derive(Debug, Error)]
pub enum SearchDecodeError {
    /// The top-level payload is not `{total_results, messages: [[...]]}`.
    #[error("malformed search response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

#[derive(Deserialize)]
struct SearchEnvelope {
    total_results: u64,
    messages: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct SearchEntry {
    id: String,
    channel_id: String,
    #[serde(default)]
    content: String,
    timestamp: String,
    author: SearchEntryAuthor,
}

#[derive(Deserialize)]
struct SearchEntryAuthor {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    bot: bool,
}

impl SearchEntry {
    fn into_record(self) -> Option<MessageRecord> {
        MessageRecord::from_raw(RawMessage {
            id: &self.id,
            channel_id: &self.channel_id,
            author_id: &self.author.id,
            author_username: &self.author.username,
            author_bot: self.author.bot,
            content: &self.content,
            timestamp: &self.timestamp,
        })
        .ok()
    }
}

fn is_hit(entry: &Value) -> bool {
    entry.get("hit").and_then(Value::as_bool).unwrap_or(false)
}

/// Decodes a grouped search response into a flat list of hits.
///
/// Groups are walked in order, then the entries inside each group. Only
/// entries flagged `hit: true` are kept; context entries are discarded. A
/// hit that is individually malformed is skipped without failing the rest.
///
/// # Errors
///
/// Returns [`SearchDecodeError::MalformedResponse`] when the body is not
/// JSON or lacks the `total_results` and `messages` fields.
///
/// # Examples
///
/// ```
/// use dca::chat::services::decode_search_response;
///
/// let body = br#"{"total_results": 0, "messages": []}"#;
/// let result = decode_search_response(body).expect("valid response");
/// assert_eq!(result.total_results(), 0);
/// assert!(result.hits().is_empty());
/// ```
pub fn decode_search_response(body: &[u8]) -> Result<SearchResult, SearchDecodeError> {
    let envelope: SearchEnvelope =
        serde_json::from_slice(body).map_err(SearchDecodeError::MalformedResponse)?;

    let hits = envelope
        .messages
        .into_iter()
        .flatten()
        .filter(is_hit)
        .filter_map(|entry| {
            let record = serde_json::from_value::<SearchEntry>(entry)
                .ok()
                .and_then(SearchEntry::into_record);
            if record.is_none() {
                tracing::debug!("skipping malformed search hit");
            }
            record
        })
        .collect();

    Ok(SearchResult::new(envelope.total_results, hits))
}

/// Errors returned by [`SearchService`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The search response could not be decoded.
    #[error(transparent)]
    Decode(#[from] SearchDecodeError),
}

/// Runs guild searches through a transport.
#[derive(Clone)]
pub struct SearchService<T>
where
    T: ChatTransport,
{
    transport: Arc<T>,
}

impl<T> SearchService<T>
where
    T: ChatTransport,
{
    /// Creates a search service.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Searches a guild and decodes one page of hits.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] when the request fails and
    /// [`SearchError::Decode`] when the response is malformed.
    pub async fn search(
        &self,
        guild_id: &GuildId,
        query: &SearchQuery,
    ) -> Result<SearchResult, SearchError> {
        let params = query.to_params();
        tracing::debug!(guild_id = %guild_id, offset = query.offset(), "searching guild messages");
        let body = self
            .transport
            .search_guild_messages(guild_id, &params)
            .await?;
        Ok(decode_search_response(&body)?)
    }
}
