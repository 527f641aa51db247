//! Application services for reading and acting on chat history.

pub mod aggregator;
pub mod conversations;
pub mod direct;
mod fan_out;
pub mod forum;
pub mod identity;
pub mod search;

pub use aggregator::{
    ACTIVITY_CHANNELS_PER_GUILD, ACTIVITY_MAX_IN_FLIGHT, ACTIVITY_MESSAGES_PER_CONTAINER,
    ActivityAggregator, ActivityReport, ActivityWindow,
};
pub use conversations::{CONVERSATION_MAX_IN_FLIGHT, ConversationEnumerator};
pub use direct::{DirectMessageError, DirectMessageResult, DirectMessageService};
pub use fan_out::{FetchOutcome, FetchStatus};
pub use forum::ForumService;
pub use identity::{
    IDENTITY_CHANNELS_PER_GUILD, IDENTITY_MESSAGES_PER_CONTAINER, IdentityError, IdentityResolver,
    IdentityResult, ResolvedUser, ScanBounds,
};
pub use search::{SearchDecodeError, SearchError, SearchService, decode_search_response};
