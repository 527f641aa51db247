//! Canonical message timestamps.
//!
//! The platform emits ISO-8601 strings with varying fractional precision and
//! offsets. Comparing those strings lexicographically only works when every
//! value shares one zero-padded form, so timestamps are parsed into a UTC
//! instant at the boundary and ordered as instants.

use super::ChatDomainError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A UTC instant at which a message was posted.
///
/// Ordering follows the instant, so `2026-02-24T11:00:00+01:00` and
/// `2026-02-24T10:00:00Z` compare equal. The canonical rendering always
/// carries an explicit `+00:00` offset. Fractional seconds are kept, at
/// millisecond, microsecond, or nanosecond precision as needed, so the
/// serialised form parses back to the same instant.
///
/// # Examples
///
/// ```
/// use dca::chat::domain::Timestamp;
///
/// let early: Timestamp = "2026-02-24T10:00:00.250+00:00".parse().expect("valid");
/// let late: Timestamp = "2026-02-24T12:00:00+02:00".parse().expect("valid");
/// assert!(early > late);
/// assert_eq!(late.to_string(), "2026-02-24T10:00:00+00:00");
/// assert_eq!(early.to_string(), "2026-02-24T10:00:00.250+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parses an RFC 3339 timestamp with any offset, normalising to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ChatDomainError::InvalidTimestamp`] when the value is not a
    /// valid RFC 3339 instant.
    pub fn parse(value: &str) -> Result<Self, ChatDomainError> {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|parsed| Self(parsed.with_timezone(&Utc)))
            .map_err(|_| ChatDomainError::InvalidTimestamp(value.to_owned()))
    }

    /// Wraps an existing UTC instant.
    #[must_use]
    pub const fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Returns the wrapped UTC instant.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl FromStr for Timestamp {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ChatDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }
}
