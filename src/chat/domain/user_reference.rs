//! Command-line references to users.

use super::{ChatDomainError, UserId};
use std::fmt;
use std::str::FromStr;

/// A user named either by stable identifier or by username.
///
/// An all-digit argument is taken as an identifier; anything else must be
/// resolved by scanning recent history.
///
/// # Examples
///
/// ```
/// use dca::chat::domain::UserReference;
///
/// let by_id: UserReference = "80351110224678912".parse().expect("valid");
/// assert!(matches!(by_id, UserReference::Id(_)));
///
/// let by_name: UserReference = "bob".parse().expect("valid");
/// assert!(matches!(by_name, UserReference::Username(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserReference {
    /// A stable user identifier.
    Id(UserId),
    /// A username that still needs resolving.
    Username(String),
}

impl FromStr for UserReference {
    type Err = ChatDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = UserId::new(s).map_err(|_| ChatDomainError::EmptyUsername)?;
        if candidate.is_snowflake() {
            Ok(Self::Id(candidate))
        } else {
            Ok(Self::Username(candidate.into()))
        }
    }
}

impl fmt::Display for UserReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}
