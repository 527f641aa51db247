//! Unit tests for cross-source activity aggregation.

use std::sync::Arc;

use super::fixtures::{author, channel_id, direct, guild, message, text_channel, voice_channel};
use crate::chat::{
    adapters::InMemoryChatTransport,
    domain::{ActivityFilter, ActivitySource, SourceKind},
    ports::{TransportError, transport::MockChatTransport},
    services::{ACTIVITY_MESSAGES_PER_CONTAINER, ActivityAggregator, FetchStatus},
};
use rstest::{fixture, rstest};

/// Two direct conversations and one guild with a voice channel between
/// four text channels.
#[fixture]
fn platform() -> InMemoryChatTransport {
    let transport = InMemoryChatTransport::new();
    let alice = author("1", "alice");
    let bob = author("2", "bob");
    let carol = author("3", "carol");

    transport
        .add_direct_conversation(direct("d1", &alice))
        .expect("scripting should succeed");
    transport
        .add_direct_conversation(direct("d2", &bob))
        .expect("scripting should succeed");
    transport
        .add_messages(
            &channel_id("d1"),
            vec![
                message("11", "d1", &alice, "morning", "2024-01-15T08:00:00+00:00"),
                message("12", "d1", &alice, "lunch?", "2024-01-15T12:00:00+00:00"),
            ],
        )
        .expect("scripting should succeed");
    transport
        .add_messages(
            &channel_id("d2"),
            vec![message("21", "d2", &bob, "ping", "2024-01-15T10:00:00+00:00")],
        )
        .expect("scripting should succeed");

    transport
        .add_guild(
            guild("g1", "Rustaceans"),
            vec![
                text_channel("c1", "general"),
                voice_channel("v1", "lounge"),
                text_channel("c2", "help"),
                text_channel("c3", "jobs"),
                text_channel("c4", "offtopic"),
            ],
        )
        .expect("scripting should succeed");
    transport
        .add_messages(
            &channel_id("c1"),
            vec![message("31", "c1", &carol, "release!", "2024-01-15T11:00:00+00:00")],
        )
        .expect("scripting should succeed");
    transport
        .add_messages(
            &channel_id("c4"),
            vec![message("41", "c4", &carol, "unseen", "2024-01-15T23:00:00+00:00")],
        )
        .expect("scripting should succeed");
    transport
}

fn ids(records: &[crate::chat::domain::ActivityRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record.message().id().as_str())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn merges_all_sources_newest_first(platform: InMemoryChatTransport) {
    let aggregator = ActivityAggregator::new(Arc::new(platform));

    let report = aggregator
        .recent(0, ActivityFilter::All)
        .await
        .expect("aggregation should succeed");

    assert_eq!(ids(report.records()), vec!["12", "31", "21", "11"]);
    let timestamps: Vec<_> = report.records().iter().map(|r| r.timestamp()).collect();
    assert!(timestamps.windows(2).all(|pair| pair.first() >= pair.last()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_first_three_text_channels_are_sampled(platform: InMemoryChatTransport) {
    let transport = Arc::new(platform);
    let aggregator = ActivityAggregator::new(Arc::clone(&transport));

    let report = aggregator
        .recent(0, ActivityFilter::Group)
        .await
        .expect("aggregation should succeed");

    let fetched: Vec<String> = transport
        .fetch_log()
        .expect("log should be readable")
        .into_iter()
        .map(|(channel, count)| {
            assert_eq!(count, ACTIVITY_MESSAGES_PER_CONTAINER);
            channel.to_string()
        })
        .collect();
    assert_eq!(fetched, vec!["c1", "c2", "c3"]);
    assert_eq!(ids(report.records()), vec!["31"]);
}

#[rstest]
#[case(ActivityFilter::Direct, SourceKind::Direct, 3)]
#[case(ActivityFilter::Group, SourceKind::Group, 1)]
#[tokio::test(flavor = "multi_thread")]
async fn filter_restricts_sources(
    platform: InMemoryChatTransport,
    #[case] filter: ActivityFilter,
    #[case] kind: SourceKind,
    #[case] expected: usize,
) {
    let aggregator = ActivityAggregator::new(Arc::new(platform));

    let report = aggregator
        .recent(0, filter)
        .await
        .expect("aggregation should succeed");

    assert_eq!(report.records().len(), expected);
    assert!(report.records().iter().all(|r| r.source_kind() == kind));
}

#[rstest]
#[case(1, vec!["12"])]
#[case(2, vec!["12", "31"])]
#[case(10, vec!["12", "31", "21", "11"])]
#[tokio::test(flavor = "multi_thread")]
async fn limit_keeps_most_recent_records(
    platform: InMemoryChatTransport,
    #[case] limit: usize,
    #[case] expected: Vec<&str>,
) {
    let aggregator = ActivityAggregator::new(Arc::new(platform));

    let report = aggregator
        .recent(limit, ActivityFilter::All)
        .await
        .expect("aggregation should succeed");

    assert_eq!(ids(report.records()), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_container_contributes_nothing(platform: InMemoryChatTransport) {
    platform
        .fail_channel(&channel_id("d1"))
        .expect("scripting should succeed");
    let aggregator = ActivityAggregator::new(Arc::new(platform));

    let report = aggregator
        .recent(0, ActivityFilter::All)
        .await
        .expect("aggregation should succeed");

    assert_eq!(ids(report.records()), vec!["31", "21"]);
    assert_eq!(report.outcomes().len(), 5);
    assert_eq!(report.failed_containers(), 1);
    assert_eq!(report.contributing_containers(), 2);
    assert!(matches!(
        report.outcomes().first().map(|o| o.status()),
        Some(FetchStatus::Failed(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inaccessible_guild_is_skipped(platform: InMemoryChatTransport) {
    platform
        .add_guild(guild("g2", "Locked"), Vec::new())
        .expect("scripting should succeed");
    platform
        .fail_guild_channels(&super::fixtures::guild_id("g2"))
        .expect("scripting should succeed");
    let aggregator = ActivityAggregator::new(Arc::new(platform));

    let report = aggregator
        .recent(0, ActivityFilter::Group)
        .await
        .expect("aggregation should succeed");

    assert_eq!(ids(report.records()), vec!["31"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guild_listing_failure_is_fatal(platform: InMemoryChatTransport) {
    platform
        .fail_guild_listing()
        .expect("scripting should succeed");
    let aggregator = ActivityAggregator::new(Arc::new(platform));

    let result = aggregator.recent(0, ActivityFilter::All).await;

    assert!(matches!(result, Err(TransportError::Rejected { status: 403, .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn equal_timestamps_keep_enumeration_order() {
    let transport = InMemoryChatTransport::new();
    let alice = author("1", "alice");
    let bob = author("2", "bob");
    let at = "2024-01-15T09:00:00+00:00";
    transport
        .add_direct_conversation(direct("d1", &alice))
        .expect("scripting should succeed");
    transport
        .add_direct_conversation(direct("d2", &bob))
        .expect("scripting should succeed");
    transport
        .add_messages(&channel_id("d1"), vec![message("1", "d1", &alice, "a", at)])
        .expect("scripting should succeed");
    transport
        .add_messages(&channel_id("d2"), vec![message("2", "d2", &bob, "b", at)])
        .expect("scripting should succeed");
    let aggregator = ActivityAggregator::new(Arc::new(transport));

    let report = aggregator
        .recent(0, ActivityFilter::Direct)
        .await
        .expect("aggregation should succeed");

    assert_eq!(ids(report.records()), vec!["1", "2"]);
    let peers: Vec<_> = report
        .records()
        .iter()
        .map(|record| match record.source() {
            ActivitySource::Direct { peer } => peer.as_ref().map(|p| p.username().to_owned()),
            ActivitySource::Group { .. } => None,
        })
        .collect();
    assert_eq!(peers, vec![Some("alice".to_owned()), Some("bob".to_owned())]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn direct_only_never_lists_guilds() {
    let mut transport = MockChatTransport::new();
    transport
        .expect_list_direct_conversations()
        .times(1)
        .returning(|| Ok(Vec::new()));
    transport.expect_list_guilds().never();
    let aggregator = ActivityAggregator::new(Arc::new(transport));

    let report = aggregator
        .recent(5, ActivityFilter::Direct)
        .await
        .expect("aggregation should succeed");

    assert!(report.records().is_empty());
}
