//! Cross-source activity aggregation.
//!
//! Provides [`ActivityAggregator`], which samples a small window of recent
//! messages from every reachable direct conversation and from the first few
//! text channels of every guild, then merges the samples into one
//! newest-first feed.

use super::fan_out::{FetchOutcome, fetch_all};
use crate::chat::{
    domain::{ActivityFilter, ActivityRecord, ActivitySource, ChannelId},
    ports::{ChatTransport, TransportResult},
};
use serde::Serialize;
use std::sync::Arc;

/// Messages sampled from each direct conversation or guild channel.
pub const ACTIVITY_MESSAGES_PER_CONTAINER: usize = 5;

/// Text channels inspected per guild, in listing order.
pub const ACTIVITY_CHANNELS_PER_GUILD: usize = 3;

/// Fetches allowed in flight at once during a fan-out.
pub const ACTIVITY_MAX_IN_FLIGHT: usize = 4;

/// Sampling bounds for activity aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityWindow {
    /// Messages fetched per container.
    pub messages_per_container: usize,
    /// Text channels inspected per guild.
    pub channels_per_guild: usize,
    /// Concurrent fetch cap.
    pub max_in_flight: usize,
}

impl Default for ActivityWindow {
    fn default() -> Self {
        Self {
            messages_per_container: ACTIVITY_MESSAGES_PER_CONTAINER,
            channels_per_guild: ACTIVITY_CHANNELS_PER_GUILD,
            max_in_flight: ACTIVITY_MAX_IN_FLIGHT,
        }
    }
}

/// Aggregated activity plus per-container fetch outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    #[serde(rename = "activity")]
    records: Vec<ActivityRecord>,
    #[serde(rename = "sources")]
    outcomes: Vec<FetchOutcome>,
}

impl ActivityReport {
    /// Returns the merged records, newest first.
    #[must_use]
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Consumes the report, returning the merged records.
    #[must_use]
    pub fn into_records(self) -> Vec<ActivityRecord> {
        self.records
    }

    /// Returns one outcome per inspected container, in enumeration order.
    #[must_use]
    pub fn outcomes(&self) -> &[FetchOutcome] {
        &self.outcomes
    }

    /// Counts containers that contributed at least one record.
    #[must_use]
    pub fn contributing_containers(&self) -> usize {
        self.outcomes.iter().filter(|o| o.contributed()).count()
    }

    /// Counts containers whose fetch failed.
    #[must_use]
    pub fn failed_containers(&self) -> usize {
        self.outcomes.iter().filter(|o| o.failed()).count()
    }
}

/// Merges recent messages from many containers into one timeline.
#[derive(Clone)]
pub struct ActivityAggregator<T>
where
    T: ChatTransport,
{
    transport: Arc<T>,
    window: ActivityWindow,
}

impl<T> ActivityAggregator<T>
where
    T: ChatTransport,
{
    /// Creates an aggregator with the default sampling window.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_window(transport, ActivityWindow::default())
    }

    /// Creates an aggregator with explicit sampling bounds.
    #[must_use]
    pub const fn with_window(transport: Arc<T>, window: ActivityWindow) -> Self {
        Self { transport, window }
    }

    /// Returns recent activity, newest first.
    ///
    /// `limit == 0` returns everything collected. Records with equal
    /// timestamps keep their enumeration order: direct conversations first,
    /// then guild channels in listing order.
    ///
    /// # Errors
    ///
    /// Returns the transport error when direct conversations or guilds cannot
    /// be listed at all. Failures fetching a single container are recorded in
    /// the report's outcomes instead.
    pub async fn recent(
        &self,
        limit: usize,
        filter: ActivityFilter,
    ) -> TransportResult<ActivityReport> {
        let mut targets = Vec::new();
        if filter.includes_direct() {
            targets.extend(self.direct_targets().await?);
        }
        if filter.includes_groups() {
            targets.extend(self.guild_targets().await?);
        }

        let fetched = fetch_all(
            &*self.transport,
            targets,
            self.window.messages_per_container,
            self.window.max_in_flight,
        )
        .await;

        let mut records = Vec::new();
        let mut outcomes = Vec::with_capacity(fetched.len());
        for item in fetched {
            let (source, outcome, messages) = item.settle();
            records.extend(
                messages
                    .into_iter()
                    .map(|message| ActivityRecord::new(message, source.clone())),
            );
            outcomes.push(outcome);
        }

        records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        if limit > 0 {
            records.truncate(limit);
        }

        tracing::debug!(
            records = records.len(),
            containers = outcomes.len(),
            "aggregated recent activity"
        );
        Ok(ActivityReport { records, outcomes })
    }

    async fn direct_targets(&self) -> TransportResult<Vec<(ChannelId, ActivitySource)>> {
        let conversations = self.transport.list_direct_conversations().await?;
        Ok(conversations
            .into_iter()
            .map(|conversation| {
                let source = ActivitySource::Direct {
                    peer: conversation.peer().cloned(),
                };
                (conversation.channel_id().clone(), source)
            })
            .collect())
    }

    async fn guild_targets(&self) -> TransportResult<Vec<(ChannelId, ActivitySource)>> {
        let guilds = self.transport.list_guilds().await?;
        let mut targets = Vec::new();
        for guild in guilds {
            let channels = match self.transport.list_channels(guild.id()).await {
                Ok(channels) => channels,
                Err(err) => {
                    tracing::warn!(guild_id = %guild.id(), error = %err, "skipping inaccessible guild");
                    continue;
                }
            };
            targets.extend(
                channels
                    .into_iter()
                    .filter(|channel| channel.kind().is_text())
                    .take(self.window.channels_per_guild)
                    .map(|channel| {
                        let source = ActivitySource::Group {
                            guild_id: guild.id().clone(),
                            guild_name: guild.name().to_owned(),
                            channel_name: channel.name().to_owned(),
                        };
                        (channel.id().clone(), source)
                    }),
            );
        }
        Ok(targets)
    }
}
