//! Given steps for identity resolution BDD scenarios.

use super::world::{IdentityWorld, author, text_channel};
use dca::chat::domain::{ChannelId, DirectConversation, GuildId};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"direct conversation "{channel}" has a message from user "{id}" named "{username}""#)]
fn direct_conversation_with_message(
    world: &mut IdentityWorld,
    channel: String,
    id: String,
    username: String,
) -> Result<(), eyre::Report> {
    let channel_id = ChannelId::new(channel)?;
    let peer = author(&id, &username)?;
    world
        .platform
        .add_direct_conversation(DirectConversation::new(channel_id.clone(), Some(peer.clone())))
        .wrap_err("add direct conversation")?;
    world.post(&channel_id, &peer)?;
    world.direct_channels.push(channel_id);
    Ok(())
}

#[given(
    r#"guild "{guild}" has text channel "{channel}" with a message from user "{id}" named "{username}""#
)]
fn guild_channel_with_message(
    world: &mut IdentityWorld,
    guild: String,
    channel: String,
    id: String,
    username: String,
) -> Result<(), eyre::Report> {
    let listed = text_channel(&channel)?;
    let poster = author(&id, &username)?;
    world.post(listed.id(), &poster).wrap_err("post guild message")?;
    world.guild_channels.push((GuildId::new(guild)?, listed));
    Ok(())
}

#[given(r#"channel "{channel}" cannot be read"#)]
fn channel_cannot_be_read(world: &mut IdentityWorld, channel: String) -> Result<(), eyre::Report> {
    world
        .platform
        .fail_channel(&ChannelId::new(channel)?)
        .wrap_err("mark channel unreadable")?;
    Ok(())
}

#[given("the scan inspects {count:usize} channels per guild")]
fn scan_inspects_channels(world: &mut IdentityWorld, count: usize) {
    world.bounds.channels_per_guild = count;
}
