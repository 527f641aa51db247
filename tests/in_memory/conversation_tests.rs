//! Direct conversation listing.

use crate::in_memory::helpers::{TestResult, runtime, scripted_platform};
use dca::chat::{
    domain::{ChannelId, ConversationSummary},
    services::ConversationEnumerator,
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

fn peers(summaries: &[ConversationSummary]) -> Vec<&str> {
    summaries
        .iter()
        .filter_map(|summary| summary.peer().map(dca::chat::domain::Author::username))
        .collect()
}

#[rstest]
#[case(false, &["alice", "bob", "carol"])]
#[case(true, &["alice", "bob"])]
fn orders_by_last_activity(
    runtime: io::Result<Runtime>,
    #[case] active_only: bool,
    #[case] expected: &[&str],
) -> TestResult {
    let rt = runtime?;
    let enumerator = ConversationEnumerator::new(scripted_platform()?);

    let summaries = rt.block_on(enumerator.list(0, active_only))?;

    assert_eq!(peers(&summaries), expected);
    Ok(())
}

#[rstest]
fn limit_truncates_after_sorting(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let enumerator = ConversationEnumerator::new(scripted_platform()?);

    let summaries = rt.block_on(enumerator.list(1, false))?;

    assert_eq!(peers(&summaries), ["alice"]);
    let last = summaries.first().and_then(ConversationSummary::last_message);
    assert_eq!(last.map(dca::chat::domain::MessageRecord::content), Some("hey alice"));
    Ok(())
}

#[rstest]
fn unreadable_conversation_sorts_last(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    platform.fail_channel(&ChannelId::new("11")?)?;
    let enumerator = ConversationEnumerator::new(platform);

    let summaries = rt.block_on(enumerator.list(0, false))?;

    assert_eq!(peers(&summaries), ["bob", "alice", "carol"]);
    Ok(())
}
