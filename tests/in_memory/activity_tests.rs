//! Recent activity across direct conversations and guild channels.

use crate::in_memory::helpers::{TestResult, runtime, scripted_platform};
use dca::chat::{
    domain::{ActivityFilter, ChannelId, SourceKind},
    services::ActivityAggregator,
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

fn timeline(records: &[dca::chat::domain::ActivityRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record.message().content())
        .collect()
}

#[rstest]
fn merges_every_container_newest_first(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let aggregator = ActivityAggregator::new(scripted_platform()?);

    let report = rt.block_on(aggregator.recent(0, ActivityFilter::All))?;

    assert_eq!(
        timeline(report.records()),
        ["guild chatter", "hey alice", "hi from alice", "old news"]
    );
    assert_eq!(report.failed_containers(), 0);
    Ok(())
}

#[rstest]
#[case(ActivityFilter::Direct, SourceKind::Direct, 3)]
#[case(ActivityFilter::Group, SourceKind::Group, 1)]
fn filter_limits_sources(
    runtime: io::Result<Runtime>,
    #[case] filter: ActivityFilter,
    #[case] kind: SourceKind,
    #[case] expected: usize,
) -> TestResult {
    let rt = runtime?;
    let aggregator = ActivityAggregator::new(scripted_platform()?);

    let report = rt.block_on(aggregator.recent(0, filter))?;

    assert_eq!(report.records().len(), expected);
    assert!(report.records().iter().all(|r| r.source_kind() == kind));
    Ok(())
}

#[rstest]
fn limit_keeps_the_newest_records(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let aggregator = ActivityAggregator::new(scripted_platform()?);

    let report = rt.block_on(aggregator.recent(2, ActivityFilter::All))?;

    assert_eq!(timeline(report.records()), ["guild chatter", "hey alice"]);
    Ok(())
}

#[rstest]
fn failing_channel_is_reported_not_fatal(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    platform.fail_channel(&ChannelId::new("12")?)?;
    let aggregator = ActivityAggregator::new(platform);

    let report = rt.block_on(aggregator.recent(0, ActivityFilter::All))?;

    assert_eq!(report.failed_containers(), 1);
    assert!(!timeline(report.records()).contains(&"old news"));
    Ok(())
}

#[rstest]
fn voice_channels_are_never_fetched(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    let aggregator = ActivityAggregator::new(std::sync::Arc::clone(&platform));

    rt.block_on(aggregator.recent(0, ActivityFilter::Group))?;

    let fetched: Vec<String> = platform
        .fetch_log()?
        .into_iter()
        .map(|(channel, _)| channel.as_str().to_owned())
        .collect();
    assert_eq!(fetched.len(), 2);
    assert!(fetched.contains(&"501".to_owned()));
    assert!(fetched.contains(&"503".to_owned()));
    Ok(())
}

#[rstest]
fn guild_listing_failure_aborts_the_query(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    platform.fail_guild_listing()?;
    let aggregator = ActivityAggregator::new(platform);

    let result = rt.block_on(aggregator.recent(0, ActivityFilter::All));

    assert!(result.is_err());
    Ok(())
}
