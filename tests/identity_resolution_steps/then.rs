//! Then steps for identity resolution BDD scenarios.

use super::world::IdentityWorld;
use dca::chat::services::IdentityError;
use rstest_bdd_macros::then;

#[then(r#"the resolved id is "{id}""#)]
fn resolved_id_is(world: &IdentityWorld, id: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing resolution result in scenario world"))?;
    match result {
        Ok(resolved) if resolved.id.as_str() == id => Ok(()),
        other => Err(eyre::eyre!("expected user '{id}', got {other:?}")),
    }
}

#[then(r#"resolution fails because "{username}" was not found"#)]
fn resolution_not_found(world: &IdentityWorld, username: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing resolution result in scenario world"))?;
    if !matches!(result, Err(IdentityError::NotFound { username: missing }) if *missing == username)
    {
        return Err(eyre::eyre!("expected not-found error, got {result:?}"));
    }
    Ok(())
}

#[then("no guild channel was scanned")]
fn no_guild_channel_scanned(world: &IdentityWorld) -> Result<(), eyre::Report> {
    let log = world.platform.fetch_log()?;
    if let Some((channel, _)) = log
        .iter()
        .find(|(channel, _)| !world.direct_channels.contains(channel))
    {
        return Err(eyre::eyre!("unexpected fetch from channel {channel}"));
    }
    Ok(())
}

#[then("no channel was scanned")]
fn no_channel_scanned(world: &IdentityWorld) -> Result<(), eyre::Report> {
    let log = world.platform.fetch_log()?;
    if !log.is_empty() {
        return Err(eyre::eyre!("expected no fetches, got {log:?}"));
    }
    Ok(())
}
