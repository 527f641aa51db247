//! Handlers for commands that talk to the chat platform.
//!
//! Handlers are generic over the transport so the same dispatch runs against
//! the REST adapter in the binary and the in-memory adapter in tests. Each
//! handler returns the `data` payload of the success envelope.

use super::approval::Approver;
use super::args::{
    ActivityCommand, ChannelsCommand, ChatCommand, DmCommand, ForumCommand, MessageCommand,
    ReactionArgs, ReactionCommand, SearchArgs, ServersCommand,
};
use super::{CliError, CliResult};
use crate::chat::{
    domain::{ChannelId, MessageId, SearchQuery},
    ports::{ChatActions, ChatTransport},
    services::{
        ActivityAggregator, ConversationEnumerator, DirectMessageService, ForumService,
        SearchService,
    },
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

type Payload = Map<String, Value>;

/// Outcome of the dry-run and approval checks for a mutating command.
enum Gate {
    Proceed,
    Answer(Value),
}

fn listing<S: Serialize>(key: &str, items: &[S]) -> CliResult<Payload> {
    let mut payload = Payload::new();
    payload.insert(key.to_owned(), serde_json::to_value(items)?);
    payload.insert("count".to_owned(), Value::from(items.len()));
    Ok(payload)
}

fn listed<S: Serialize>(key: &str, items: &[S]) -> CliResult<Value> {
    listing(key, items).map(Value::Object)
}

fn target(channel_id: &ChannelId, message_id: &MessageId) -> Payload {
    let mut payload = Payload::new();
    payload.insert("channel_id".to_owned(), Value::from(channel_id.as_str()));
    payload.insert("message_id".to_owned(), Value::from(message_id.as_str()));
    payload
}

fn with_field(mut payload: Payload, key: &str, value: impl Into<Value>) -> Payload {
    payload.insert(key.to_owned(), value.into());
    payload
}

/// Dry runs echo `echo` without prompting; otherwise the approver decides.
fn gate(
    approver: &mut dyn Approver,
    dry_run: bool,
    action: &str,
    echo: Payload,
    summary: &str,
) -> CliResult<Gate> {
    if dry_run {
        let mut answer = with_field(echo, "action", action);
        answer.insert("dry_run".to_owned(), Value::Bool(true));
        return Ok(Gate::Answer(Value::Object(answer)));
    }
    if approver.approve(summary).map_err(CliError::Prompt)? {
        Ok(Gate::Proceed)
    } else {
        tracing::info!(action, "action cancelled");
        Ok(Gate::Answer(json!({ "action": action, "cancelled": true })))
    }
}

/// Runs one platform command and returns its envelope payload.
///
/// # Errors
///
/// Returns [`CliError`] when argument validation, identity resolution,
/// the platform call, or the approval prompt fails.
pub async fn execute<T>(
    command: ChatCommand,
    transport: Arc<T>,
    approver: &mut dyn Approver,
) -> CliResult<Value>
where
    T: ChatTransport + ChatActions,
{
    match command {
        ChatCommand::Activity {
            command: ActivityCommand::Recent { limit, kind },
        } => {
            let report = ActivityAggregator::new(transport).recent(limit, kind).await?;
            listed("activity", report.records())
        }
        ChatCommand::Dm { command } => direct_messages(command, transport, approver).await,
        ChatCommand::Search(args) => search(args, transport).await,
        ChatCommand::Servers { command } => servers(command, &*transport).await,
        ChatCommand::Channels { command } => channels(command, &*transport).await,
        ChatCommand::Message { command } => messages(command, &*transport, approver).await,
        ChatCommand::Reaction { command } => reactions(command, &*transport, approver).await,
        ChatCommand::Forum { command } => forum(command, transport).await,
    }
}

async fn direct_messages<T>(
    command: DmCommand,
    transport: Arc<T>,
    approver: &mut dyn Approver,
) -> CliResult<Value>
where
    T: ChatTransport + ChatActions,
{
    match command {
        DmCommand::List { limit, active_only } => {
            let summaries = ConversationEnumerator::new(transport)
                .list(limit, active_only)
                .await?;
            listed("dm_channels", &summaries)
        }
        DmCommand::History { user, limit } => {
            let history = DirectMessageService::new(transport)
                .history(&user, limit)
                .await?;
            listed("messages", &history)
        }
        DmCommand::Send {
            user,
            message,
            dry_run,
        } => {
            let service = DirectMessageService::new(transport);
            let recipient = service.resolve(&user).await?;
            let label = recipient.label();
            let summary = if label == recipient.id.as_str() {
                format!("Send DM to user {}:\n   \"{message}\"\n", recipient.id)
            } else {
                format!("Send DM to {label} ({}):\n   \"{message}\"\n", recipient.id)
            };
            let mut echo = Payload::new();
            echo.insert("user_id".to_owned(), Value::from(recipient.id.as_str()));
            echo.insert("username".to_owned(), Value::from(label));
            echo.insert("content".to_owned(), Value::from(message.as_str()));
            match gate(approver, dry_run, "send_dm", echo, &summary)? {
                Gate::Answer(answer) => Ok(answer),
                Gate::Proceed => Ok(serde_json::to_value(
                    service.send(&recipient, &message).await?,
                )?),
            }
        }
    }
}

async fn search<T: ChatTransport>(args: SearchArgs, transport: Arc<T>) -> CliResult<Value> {
    let mut query = SearchQuery::new(args.query)?.with_offset(args.offset);
    if let Some(channel_id) = args.channel_id {
        query = query.with_channel(channel_id);
    }
    if let Some(author_id) = args.author_id {
        query = query.with_author(author_id);
    }
    if let Some(has) = args.has {
        query = query.with_attachment(has);
    }
    if let Some(field) = args.sort_by {
        query = query.with_sort_by(field);
    }
    if let Some(order) = args.sort_order {
        query = query.with_sort_order(order);
    }

    let result = SearchService::new(transport)
        .search(&args.server_id, &query)
        .await?;
    let hits = with_field(
        listing("messages", result.hits())?,
        "total_results",
        result.total_results(),
    );
    Ok(Value::Object(with_field(hits, "offset", query.offset())))
}

async fn servers<T>(command: ServersCommand, transport: &T) -> CliResult<Value>
where
    T: ChatTransport + ChatActions,
{
    match command {
        ServersCommand::List => listed("servers", &transport.list_guilds().await?),
        ServersCommand::Info { server_id } => Ok(serde_json::to_value(
            transport.guild_details(&server_id).await?,
        )?),
    }
}

async fn channels<T: ChatTransport>(command: ChannelsCommand, transport: &T) -> CliResult<Value> {
    match command {
        ChannelsCommand::List { server_id } => {
            listed("channels", &transport.list_channels(&server_id).await?)
        }
        ChannelsCommand::History { channel_id, limit } => listed(
            "messages",
            &transport.fetch_messages(&channel_id, limit).await?,
        ),
    }
}

async fn messages<T: ChatActions>(
    command: MessageCommand,
    transport: &T,
    approver: &mut dyn Approver,
) -> CliResult<Value> {
    match command {
        MessageCommand::Send {
            channel_id,
            message,
            dry_run,
        } => {
            let mut echo = Payload::new();
            echo.insert("channel_id".to_owned(), Value::from(channel_id.as_str()));
            echo.insert("content".to_owned(), Value::from(message.as_str()));
            let summary = format!("Send message to channel {channel_id}:\n   \"{message}\"\n");
            match gate(approver, dry_run, "send_message", echo, &summary)? {
                Gate::Answer(answer) => Ok(answer),
                Gate::Proceed => Ok(serde_json::to_value(
                    transport.send_message(&channel_id, &message).await?,
                )?),
            }
        }
        MessageCommand::Reply {
            channel_id,
            message_id,
            message,
            dry_run,
        } => {
            let echo = with_field(
                target(&channel_id, &message_id),
                "content",
                message.as_str(),
            );
            let summary = format!(
                "Reply to message {message_id} in channel {channel_id}:\n   \"{message}\"\n"
            );
            match gate(approver, dry_run, "reply_message", echo, &summary)? {
                Gate::Answer(answer) => Ok(answer),
                Gate::Proceed => Ok(serde_json::to_value(
                    transport
                        .reply_to_message(&channel_id, &message_id, &message)
                        .await?,
                )?),
            }
        }
        MessageCommand::Edit {
            channel_id,
            message_id,
            new_message,
            dry_run,
        } => edit_message(transport, approver, &channel_id, &message_id, &new_message, dry_run)
            .await,
        MessageCommand::Delete {
            channel_id,
            message_id,
            dry_run,
        } => delete_message(transport, approver, &channel_id, &message_id, dry_run).await,
    }
}

async fn edit_message<T: ChatActions>(
    transport: &T,
    approver: &mut dyn Approver,
    channel_id: &ChannelId,
    message_id: &MessageId,
    new_content: &str,
    dry_run: bool,
) -> CliResult<Value> {
    let original = transport.fetch_message(channel_id, message_id).await?;
    let echo = with_field(
        with_field(
            target(channel_id, message_id),
            "original_content",
            original.content(),
        ),
        "new_content",
        new_content,
    );
    let summary = format!(
        "Edit message {message_id} in channel {channel_id}:\n   Old: \"{}\"\n   New: \"{new_content}\"\n",
        original.content()
    );
    match gate(approver, dry_run, "edit_message", echo, &summary)? {
        Gate::Answer(answer) => Ok(answer),
        Gate::Proceed => Ok(serde_json::to_value(
            transport
                .edit_message(channel_id, message_id, new_content)
                .await?,
        )?),
    }
}

async fn delete_message<T: ChatActions>(
    transport: &T,
    approver: &mut dyn Approver,
    channel_id: &ChannelId,
    message_id: &MessageId,
    dry_run: bool,
) -> CliResult<Value> {
    let original = transport.fetch_message(channel_id, message_id).await?;
    let echo = with_field(
        target(channel_id, message_id),
        "content",
        original.content(),
    );
    let summary = format!(
        "Delete message {message_id} in channel {channel_id}:\n   \"{}\"\n",
        original.content()
    );
    match gate(approver, dry_run, "delete_message", echo, &summary)? {
        Gate::Answer(answer) => Ok(answer),
        Gate::Proceed => {
            transport.delete_message(channel_id, message_id).await?;
            let done = with_field(target(channel_id, message_id), "action", "delete_message");
            Ok(Value::Object(with_field(done, "deleted", true)))
        }
    }
}

async fn reactions<T: ChatActions>(
    command: ReactionCommand,
    transport: &T,
    approver: &mut dyn Approver,
) -> CliResult<Value> {
    let (adding, args) = match command {
        ReactionCommand::Add(args) => (true, args),
        ReactionCommand::Remove(args) => (false, args),
    };
    let ReactionArgs {
        channel_id,
        message_id,
        emoji,
        dry_run,
    } = args;
    let (action, verb, outcome) = if adding {
        ("add_reaction", "Add", "added")
    } else {
        ("remove_reaction", "Remove", "removed")
    };
    let echo = with_field(target(&channel_id, &message_id), "emoji", emoji.as_str());
    let summary =
        format!("{verb} reaction {emoji} on message {message_id} in channel {channel_id}\n");
    if let Gate::Answer(answer) = gate(approver, dry_run, action, echo.clone(), &summary)? {
        return Ok(answer);
    }

    if adding {
        transport
            .add_reaction(&channel_id, &message_id, &emoji)
            .await?;
    } else {
        transport
            .remove_reaction(&channel_id, &message_id, &emoji)
            .await?;
    }
    let done = with_field(echo, "action", action);
    Ok(Value::Object(with_field(done, outcome, true)))
}

async fn forum<T>(command: ForumCommand, transport: Arc<T>) -> CliResult<Value>
where
    T: ChatTransport + ChatActions,
{
    let service = ForumService::new(transport);
    match command {
        ForumCommand::Threads {
            channel_id,
            limit,
            active_only,
        } => listed(
            "threads",
            &service.threads(&channel_id, limit, active_only).await?,
        ),
        ForumCommand::Messages { thread_id, limit } => listed(
            "messages",
            &service.thread_messages(&thread_id, limit).await?,
        ),
    }
}
