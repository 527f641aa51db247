//! Command-line surface: argument model, approval prompt, and dispatch.
//!
//! [`run`] resolves configuration, builds the REST transport, and hands the
//! parsed command to [`execute`]. Configuration commands never touch the
//! network.

mod approval;
pub mod args;
mod commands;
mod setup;

pub use approval::{Approver, AutoApprove, PromptApprover, is_affirmative};
pub use args::{ChatCommand, Cli, Command, ConfigCommand};
pub use commands::execute;
pub use setup::{init_config, show_config};

use crate::chat::{
    adapters::HttpChatTransport,
    domain::ChatDomainError,
    ports::TransportError,
    services::{DirectMessageError, SearchError},
};
use crate::config::{self, AppConfig, ConfigError, TOKEN_ENV};
use camino::Utf8PathBuf;
use serde_json::Value;
use std::io::{self, BufReader};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced to the user through the failure envelope.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded, saved, or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A command argument is invalid.
    #[error(transparent)]
    Domain(#[from] ChatDomainError),

    /// A platform call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A direct-message flow failed.
    #[error(transparent)]
    DirectMessage(#[from] DirectMessageError),

    /// A search failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Reading an interactive answer failed.
    #[error("failed to read response: {0}")]
    Prompt(#[source] io::Error),

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),

    /// A result could not be rendered as JSON.
    #[error("failed to render result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type CliResult<T> = Result<T, CliError>;

fn config_path(explicit: Option<Utf8PathBuf>) -> CliResult<Utf8PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(config::default_config_path()?),
    }
}

fn stored_config(explicit: Option<Utf8PathBuf>) -> CliResult<Option<AppConfig>> {
    match config_path(explicit) {
        Ok(path) => Ok(config::load_optional(&path)?),
        Err(CliError::Config(ConfigError::NoHomeDirectory)) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Runs a parsed command line and returns the success payload.
///
/// # Errors
///
/// Returns [`CliError`] for any failure; the binary renders it as the
/// failure envelope.
pub async fn run(cli: Cli) -> CliResult<Value> {
    let Cli {
        config: explicit_path,
        token,
        command,
        ..
    } = cli;
    match command {
        Command::Config {
            command: ConfigCommand::Init,
        } => {
            let path = config_path(explicit_path)?;
            let mut input = BufReader::new(io::stdin());
            init_config(&mut input, &mut io::stderr(), &path)
        }
        Command::Config {
            command: ConfigCommand::Show,
        } => show_config(&config_path(explicit_path)?),
        Command::Chat(chat) => {
            let stored = stored_config(explicit_path)?;
            let env_token = std::env::var(TOKEN_ENV).ok();
            let resolved =
                config::resolve_token(token.as_deref(), env_token.as_deref(), stored.as_ref())?;
            let settings = stored.unwrap_or_default();
            let transport = Arc::new(HttpChatTransport::new(
                &settings.transport_config(resolved),
            )?);
            if settings.require_approval {
                let mut prompt = PromptApprover::new(BufReader::new(io::stdin()), io::stderr());
                execute(chat, transport, &mut prompt).await
            } else {
                execute(chat, transport, &mut AutoApprove).await
            }
        }
    }
}
