//! Command-line argument model.

use crate::chat::domain::{
    ActivityFilter, AttachmentFilter, ChannelId, GuildId, MessageId, SortField, SortOrder,
    UserId, UserReference,
};
use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Discord CLI for agentic workflows. Every command prints one JSON envelope.
#[derive(Debug, Parser)]
#[command(name = "dca", version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.config/dca/config.json).
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Account token; overrides DCA_TOKEN and the config file.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Pretty-print the JSON envelope.
    #[arg(long, global = true)]
    pub output_pretty: bool,

    /// Log progress to stderr at info level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration management.
    Config {
        /// Configuration action.
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Commands that talk to the chat platform.
    #[command(flatten)]
    Chat(ChatCommand),
}

/// Configuration actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigCommand {
    /// Create a configuration file with interactive prompts.
    Init,
    /// Show the current configuration with the token masked.
    Show,
}

/// Commands that need an authenticated transport.
#[derive(Debug, Clone, Subcommand)]
pub enum ChatCommand {
    /// Recent activity across direct messages and servers.
    Activity {
        /// Activity action.
        #[command(subcommand)]
        command: ActivityCommand,
    },

    /// Direct message operations.
    Dm {
        /// Direct message action.
        #[command(subcommand)]
        command: DmCommand,
    },

    /// Full-text search within a server.
    Search(SearchArgs),

    /// Server operations.
    Servers {
        /// Server action.
        #[command(subcommand)]
        command: ServersCommand,
    },

    /// Channel operations.
    Channels {
        /// Channel action.
        #[command(subcommand)]
        command: ChannelsCommand,
    },

    /// Send, reply to, and manage messages.
    Message {
        /// Message action.
        #[command(subcommand)]
        command: MessageCommand,
    },

    /// Add or remove reactions.
    Reaction {
        /// Reaction action.
        #[command(subcommand)]
        command: ReactionCommand,
    },

    /// Forum channel operations.
    Forum {
        /// Forum action.
        #[command(subcommand)]
        command: ForumCommand,
    },
}

/// Activity actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ActivityCommand {
    /// Most recent messages, newest first.
    Recent {
        /// Total messages to show (0 for all sampled).
        #[arg(long, default_value_t = 15)]
        limit: usize,
        /// Filter by source: all, dm, or server.
        #[arg(long = "type", default_value = "all")]
        kind: ActivityFilter,
    },
}

/// Direct message actions.
#[derive(Debug, Clone, Subcommand)]
pub enum DmCommand {
    /// List direct conversations, most recently active first.
    List {
        /// Number of conversations to show (0 for all).
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Only show conversations with at least one message.
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        active_only: bool,
    },

    /// Read direct message history with a user.
    History {
        /// User id or username.
        user: UserReference,
        /// Number of messages to retrieve.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Send a direct message.
    Send {
        /// User id or username.
        user: UserReference,
        /// Message text.
        message: String,
        /// Show what would be sent without sending.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Search arguments.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Server to search.
    pub server_id: GuildId,
    /// Text to search for.
    pub query: String,
    /// Restrict results to one channel.
    #[arg(long)]
    pub channel_id: Option<ChannelId>,
    /// Restrict results to one author.
    #[arg(long)]
    pub author_id: Option<UserId>,
    /// Attachment type: link, embed, file, video, image, or sound.
    #[arg(long)]
    pub has: Option<AttachmentFilter>,
    /// Pagination offset (multiples of 25).
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    /// Sort by relevance or timestamp.
    #[arg(long)]
    pub sort_by: Option<SortField>,
    /// Sort order: asc or desc.
    #[arg(long)]
    pub sort_order: Option<SortOrder>,
}

/// Server actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ServersCommand {
    /// List the servers the account belongs to.
    List,
    /// Show details for one server.
    Info {
        /// Server id.
        server_id: GuildId,
    },
}

/// Channel actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ChannelsCommand {
    /// List a server's channels.
    List {
        /// Server id.
        server_id: GuildId,
    },
    /// Read a channel's recent messages.
    History {
        /// Channel id.
        channel_id: ChannelId,
        /// Number of messages to retrieve (max 100).
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

/// Message actions.
#[derive(Debug, Clone, Subcommand)]
pub enum MessageCommand {
    /// Send a message to a channel.
    Send {
        /// Channel id.
        channel_id: ChannelId,
        /// Message text.
        message: String,
        /// Show what would be sent without sending.
        #[arg(long)]
        dry_run: bool,
    },
    /// Reply to a message.
    Reply {
        /// Channel id.
        channel_id: ChannelId,
        /// Message being replied to.
        message_id: MessageId,
        /// Reply text.
        message: String,
        /// Show what would be sent without sending.
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit one of your messages.
    Edit {
        /// Channel id.
        channel_id: ChannelId,
        /// Message to edit.
        message_id: MessageId,
        /// Replacement text.
        new_message: String,
        /// Show what would change without editing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete one of your messages.
    Delete {
        /// Channel id.
        channel_id: ChannelId,
        /// Message to delete.
        message_id: MessageId,
        /// Show what would be deleted without deleting.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Reaction actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ReactionCommand {
    /// Add a reaction.
    Add(ReactionArgs),
    /// Remove your reaction.
    Remove(ReactionArgs),
}

/// Target of a reaction change.
#[derive(Debug, Clone, Args)]
pub struct ReactionArgs {
    /// Channel id.
    pub channel_id: ChannelId,
    /// Message id.
    pub message_id: MessageId,
    /// Unicode emoji or `name:id` for custom emoji.
    pub emoji: String,
    /// Show the change without applying it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Forum actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ForumCommand {
    /// List a forum's threads.
    Threads {
        /// Forum channel id.
        channel_id: ChannelId,
        /// Number of threads to show (0 for all).
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Hide archived threads.
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        active_only: bool,
    },
    /// Read messages in a thread.
    Messages {
        /// Thread id.
        thread_id: ChannelId,
        /// Number of messages to retrieve.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}
