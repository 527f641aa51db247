//! Error types for chat domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing chat domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatDomainError {
    /// An identifier of the named kind is empty after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// A timestamp is not a valid RFC 3339 instant.
    #[error("invalid timestamp '{0}': expected RFC 3339 with an explicit offset")]
    InvalidTimestamp(String),

    /// A username or display name is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Search content is empty after trimming.
    #[error("search content must not be empty")]
    EmptySearchContent,

    /// The activity filter is not one of `all`, `direct`, or `group`.
    #[error("unknown activity filter '{0}' (expected all, dm, or server)")]
    UnknownActivityFilter(String),

    /// The attachment filter is not a supported search `has` value.
    #[error(
        "unknown attachment filter '{0}' (expected link, embed, file, video, image, or sound)"
    )]
    UnknownAttachmentFilter(String),

    /// The search sort field is not recognised.
    #[error("unknown sort field '{0}' (expected relevance or timestamp)")]
    UnknownSortField(String),

    /// The search sort order is not recognised.
    #[error("unknown sort order '{0}' (expected asc or desc)")]
    UnknownSortOrder(String),
}
