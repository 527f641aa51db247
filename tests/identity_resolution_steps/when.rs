//! When steps for identity resolution BDD scenarios.

use super::world::{IdentityWorld, run_async};
use dca::chat::domain::UserReference;
use rstest_bdd_macros::when;

#[when(r#""{reference}" is resolved"#)]
fn reference_is_resolved(world: &mut IdentityWorld, reference: String) -> Result<(), eyre::Report> {
    world.install_guilds()?;
    let parsed: UserReference = reference.parse()?;
    let resolver = world.resolver();
    world.last_result = Some(run_async(resolver.resolve(&parsed)));
    Ok(())
}
