//! Full-text search queries and decoded results.

use super::{ChannelId, ChatDomainError, MessageRecord, UserId};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A message flagged by the search endpoint as matching the query.
///
/// Hits share the [`MessageRecord`] shape; context messages returned around a
/// hit are never represented.
pub type SearchHit = MessageRecord;

/// Decoded page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    total_results: u64,
    hits: Vec<SearchHit>,
}

impl SearchResult {
    /// Creates a search result page.
    #[must_use]
    pub const fn new(total_results: u64, hits: Vec<SearchHit>) -> Self {
        Self {
            total_results,
            hits,
        }
    }

    /// Returns the platform-reported total, which may exceed the page size.
    #[must_use]
    pub const fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Returns the hits on this page in platform order.
    #[must_use]
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    /// Consumes the result, returning its hits.
    #[must_use]
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.hits
    }
}

/// Attachment-type filter accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentFilter {
    /// Messages containing a link.
    Link,
    /// Messages containing an embed.
    Embed,
    /// Messages containing a file.
    File,
    /// Messages containing a video.
    Video,
    /// Messages containing an image.
    Image,
    /// Messages containing a sound clip.
    Sound,
}

impl AttachmentFilter {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Embed => "embed",
            Self::File => "file",
            Self::Video => "video",
            Self::Image => "image",
            Self::Sound => "sound",
        }
    }
}

impl FromStr for AttachmentFilter {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(Self::Link),
            "embed" => Ok(Self::Embed),
            "file" => Ok(Self::File),
            "video" => Ok(Self::Video),
            "image" => Ok(Self::Image),
            "sound" => Ok(Self::Sound),
            _ => Err(ChatDomainError::UnknownAttachmentFilter(s.to_owned())),
        }
    }
}

impl fmt::Display for AttachmentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search ordering field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Order by match relevance.
    Relevance,
    /// Order by posting time.
    Timestamp,
}

impl SortField {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Timestamp => "timestamp",
        }
    }
}

impl FromStr for SortField {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "timestamp" => Ok(Self::Timestamp),
            _ => Err(ChatDomainError::UnknownSortField(s.to_owned())),
        }
    }
}

/// Search ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ChatDomainError::UnknownSortOrder(s.to_owned())),
        }
    }
}

/// Options for a guild message search.
///
/// Only `content` is required. Unset options and an `offset` of zero are
/// omitted from the serialised parameter set.
///
/// # Examples
///
/// ```
/// use dca::chat::domain::SearchQuery;
///
/// let query = SearchQuery::new("headless").expect("valid").with_offset(25);
/// assert_eq!(
///     query.to_params(),
///     vec![
///         ("content", "headless".to_owned()),
///         ("offset", "25".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    content: String,
    author_id: Option<UserId>,
    channel_id: Option<ChannelId>,
    has: Option<AttachmentFilter>,
    offset: u32,
    sort_by: Option<SortField>,
    sort_order: Option<SortOrder>,
}

impl SearchQuery {
    /// Creates a query for the given text.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::EmptySearchContent`] when `content` is empty
    /// after trimming.
    pub fn new(content: impl Into<String>) -> Result<Self, ChatDomainError> {
        let text = content.into();
        if text.trim().is_empty() {
            return Err(ChatDomainError::EmptySearchContent);
        }
        Ok(Self {
            content: text,
            author_id: None,
            channel_id: None,
            has: None,
            offset: 0,
            sort_by: None,
            sort_order: None,
        })
    }

    /// Restricts results to one author.
    #[must_use]
    pub fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Restricts results to one channel.
    #[must_use]
    pub fn with_channel(mut self, channel_id: ChannelId) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    /// Restricts results to messages carrying an attachment type.
    #[must_use]
    pub const fn with_attachment(mut self, has: AttachmentFilter) -> Self {
        self.has = Some(has);
        self
    }

    /// Skips the first `offset` results.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the ordering field.
    #[must_use]
    pub const fn with_sort_by(mut self, field: SortField) -> Self {
        self.sort_by = Some(field);
        self
    }

    /// Sets the ordering direction.
    #[must_use]
    pub const fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Returns the search text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the pagination offset.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Serialises the query into ordered `(key, value)` pairs.
    ///
    /// Each present option appears exactly once; integers are rendered in
    /// base 10.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("content", self.content.clone())];
        if let Some(author_id) = &self.author_id {
            params.push(("author_id", author_id.to_string()));
        }
        if let Some(channel_id) = &self.channel_id {
            params.push(("channel_id", channel_id.to_string()));
        }
        if let Some(has) = self.has {
            params.push(("has", has.as_str().to_owned()));
        }
        if self.offset > 0 {
            params.push(("offset", self.offset.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.as_str().to_owned()));
        }
        if let Some(sort_order) = self.sort_order {
            params.push(("sort_order", sort_order.as_str().to_owned()));
        }
        params
    }
}
