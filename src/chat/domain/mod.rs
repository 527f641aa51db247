//! Domain model for chat activity, conversations, and search.
//!
//! All types are immutable value objects copied out of transport responses.
//! Collections are rebuilt rather than mutated when results are merged.

mod activity;
mod conversation;
mod error;
mod guild;
mod ids;
mod message;
mod search;
mod timestamp;
mod user_reference;

pub use activity::{ActivityFilter, ActivityRecord, ActivitySource, SourceKind};
pub use conversation::{ConversationSummary, DirectConversation};
pub use error::ChatDomainError;
pub use guild::{Channel, ChannelKind, ForumThread, Guild, GuildDetails};
pub use ids::{ChannelId, GuildId, MessageId, UserId};
pub use message::{Author, MessageRecord, RawMessage};
pub use search::{
    AttachmentFilter, SearchHit, SearchQuery, SearchResult, SortField, SortOrder,
};
pub use timestamp::Timestamp;
pub use user_reference::UserReference;
