//! Direct messages addressed by username or identifier.

use crate::in_memory::helpers::{TestResult, contents, runtime, scripted_platform};
use dca::chat::{
    domain::{ChannelId, UserReference},
    services::{DirectMessageError, DirectMessageService, IdentityError},
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn history_resolves_username_ignoring_case(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let service = DirectMessageService::new(scripted_platform()?);
    let reference: UserReference = "ALICE".parse()?;

    let history = rt.block_on(service.history(&reference, 10))?;

    assert_eq!(contents(&history), ["hey alice", "hi from alice"]);
    Ok(())
}

#[rstest]
fn send_by_username_reuses_the_open_conversation(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    let service = DirectMessageService::new(std::sync::Arc::clone(&platform));
    let reference: UserReference = "bob".parse()?;

    let sent = rt.block_on(async {
        let recipient = service.resolve(&reference).await?;
        service.send(&recipient, "lunch?").await
    })?;

    assert_eq!(sent.channel_id().as_str(), "12");
    assert_eq!(sent.author().username(), "me");
    let stored = platform.messages_in(&ChannelId::new("12")?)?;
    assert_eq!(contents(&stored), ["old news", "lunch?"]);
    Ok(())
}

#[rstest]
fn send_by_identifier_opens_a_new_conversation(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    let service = DirectMessageService::new(std::sync::Arc::clone(&platform));
    let reference: UserReference = "777".parse()?;

    let recipient = rt.block_on(service.resolve(&reference))?;
    assert_eq!(recipient.label(), "777");
    assert!(recipient.author.is_none());

    let sent = rt.block_on(service.send(&recipient, "hello stranger"))?;

    assert_ne!(sent.channel_id().as_str(), "11");
    let stored = platform.messages_in(sent.channel_id())?;
    assert_eq!(contents(&stored), ["hello stranger"]);
    Ok(())
}

#[rstest]
fn unknown_username_is_not_found(runtime: io::Result<Runtime>) -> TestResult {
    let rt = runtime?;
    let platform = scripted_platform()?;
    let service = DirectMessageService::new(std::sync::Arc::clone(&platform));
    let reference: UserReference = "mallory".parse()?;

    let result = rt.block_on(service.history(&reference, 10));

    assert!(matches!(
        result,
        Err(DirectMessageError::Identity(IdentityError::NotFound { ref username }))
            if username == "mallory"
    ));
    assert_eq!(platform.messages_in(&ChannelId::new("11")?)?.len(), 2);
    Ok(())
}
