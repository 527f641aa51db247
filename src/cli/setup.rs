//! `config init` and `config show`.

use super::{CliError, CliResult};
use crate::config::{self, ConfigError};
use camino::Utf8Path;
use serde_json::{Value, json};
use std::io::{BufRead, Write};

fn ask(input: &mut impl BufRead, prompts: &mut impl Write, question: &str) -> CliResult<String> {
    write!(prompts, "{question}").map_err(CliError::Prompt)?;
    prompts.flush().map_err(CliError::Prompt)?;
    let mut answer = String::new();
    input.read_line(&mut answer).map_err(CliError::Prompt)?;
    Ok(answer.trim().to_owned())
}

/// Prompts for a token and the approval setting, then saves them to `path`.
///
/// Existing endpoint overrides in the file are kept. Prompts and the
/// confirmation are written to `prompts`, never to the result stream.
///
/// # Errors
///
/// Returns [`CliError::Prompt`] when the terminal cannot be used,
/// [`ConfigError::MissingToken`] when no token is entered, and any
/// [`config::save`] failure.
pub fn init_config(
    input: &mut impl BufRead,
    prompts: &mut impl Write,
    path: &Utf8Path,
) -> CliResult<Value> {
    writeln!(
        prompts,
        "dca configuration setup\n\n\
         This tool uses your Discord user token for personal automation.\n\
         To find it, open Discord in a browser, open the developer tools network tab,\n\
         send any message, and copy the request's 'authorization' header.\n"
    )
    .map_err(CliError::Prompt)?;

    let token = ask(input, prompts, "Discord user token: ")?;
    if token.is_empty() {
        return Err(ConfigError::MissingToken.into());
    }
    let approval = ask(
        input,
        prompts,
        "Require approval for write operations? [Y/n]: ",
    )?
    .to_ascii_lowercase();
    let require_approval = approval != "n" && approval != "no";

    let mut settings = config::load_optional(path)
        .ok()
        .flatten()
        .unwrap_or_default();
    settings.user_token = token;
    settings.require_approval = require_approval;
    config::save(&settings, path)?;

    writeln!(prompts, "\nConfiguration saved to: {path}").map_err(CliError::Prompt)?;
    Ok(json!({ "path": path.as_str(), "require_approval": require_approval }))
}

/// Describes the configuration at `path` with the token masked.
///
/// # Errors
///
/// Returns the [`config::load`] failure when the file is missing or invalid.
pub fn show_config(path: &Utf8Path) -> CliResult<Value> {
    let settings = config::load(path)?;
    Ok(json!({
        "path": path.as_str(),
        "user_token": config::mask_token(&settings.user_token),
        "require_approval": settings.require_approval,
    }))
}
