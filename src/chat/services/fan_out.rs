//! Bounded, order-preserving fan-out of per-channel message fetches.
//!
//! Every target gets its own result slot, so one failing channel never
//! cancels or pollutes its siblings, and callers only see the results once
//! every fetch has settled.

use crate::chat::{
    domain::{ChannelId, MessageRecord},
    ports::{ChatTransport, TransportError, TransportResult},
};
use futures::stream::{self, StreamExt};
use serde::Serialize;

/// How one channel fared during a fan-out.
#[derive(Debug, Clone)]
pub enum FetchStatus {
    /// The fetch returned this many records.
    Fetched(usize),
    /// The fetch succeeded but the channel had no messages.
    Empty,
    /// The fetch failed; the channel contributed nothing.
    Failed(TransportError),
}

/// Per-channel outcome reported alongside aggregated results.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    channel_id: ChannelId,
    status: FetchStatus,
}

impl FetchOutcome {
    /// Returns the channel that was fetched.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Returns how the fetch went.
    #[must_use]
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Returns `true` when the channel contributed at least one record.
    #[must_use]
    pub const fn contributed(&self) -> bool {
        matches!(self.status, FetchStatus::Fetched(_))
    }

    /// Returns `true` when the fetch failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        matches!(self.status, FetchStatus::Failed(_))
    }
}

#[derive(Serialize)]
struct FetchOutcomeView<'a> {
    channel_id: &'a ChannelId,
    status: &'static str,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for FetchOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (status, records, error) = match &self.status {
            FetchStatus::Fetched(count) => ("fetched", *count, None),
            FetchStatus::Empty => ("empty", 0, None),
            FetchStatus::Failed(err) => ("failed", 0, Some(err.to_string())),
        };
        FetchOutcomeView {
            channel_id: &self.channel_id,
            status,
            records,
            error,
        }
        .serialize(serializer)
    }
}

/// A settled fetch paired with the caller's tag for that channel.
pub(crate) struct Fetched<K> {
    pub channel_id: ChannelId,
    pub tag: K,
    pub result: TransportResult<Vec<MessageRecord>>,
}

impl<K> Fetched<K> {
    /// Splits the fetch into its tag, an outcome, and any records.
    ///
    /// Failures are downgraded to an empty record set here; the outcome keeps
    /// the error for reporting.
    pub fn settle(self) -> (K, FetchOutcome, Vec<MessageRecord>) {
        let Self {
            channel_id,
            tag,
            result,
        } = self;
        let (status, records) = match result {
            Ok(records) if records.is_empty() => (FetchStatus::Empty, records),
            Ok(records) => (FetchStatus::Fetched(records.len()), records),
            Err(err) => {
                tracing::warn!(channel_id = %channel_id, error = %err, "skipping channel after failed fetch");
                (FetchStatus::Failed(err), Vec::new())
            }
        };
        (tag, FetchOutcome { channel_id, status }, records)
    }
}

/// Fetches up to `count` messages from every target with at most
/// `max_in_flight` requests outstanding.
///
/// Results come back in target order regardless of completion order.
pub(crate) async fn fetch_all<T, K>(
    transport: &T,
    targets: Vec<(ChannelId, K)>,
    count: usize,
    max_in_flight: usize,
) -> Vec<Fetched<K>>
where
    T: ChatTransport + ?Sized,
{
    stream::iter(targets)
        .map(|(channel_id, tag)| async move {
            tracing::debug!(channel_id = %channel_id, count, "fetching recent messages");
            let result = transport.fetch_messages(&channel_id, count).await;
            Fetched {
                channel_id,
                tag,
                result,
            }
        })
        .buffered(max_in_flight.max(1))
        .collect()
        .await
}
