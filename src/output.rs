//! JSON result envelope printed by every command.
//!
//! Success renders as `{"ok":true,"data":...}` and failure as
//! `{"ok":false,"error":"..."}`. Exactly one envelope is written per command.

use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

/// Errors returned while writing an envelope.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The payload could not be rendered as JSON.
    #[error("failed to render output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The output stream rejected the write.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

fn write_envelope<T: Serialize>(
    out: &mut impl Write,
    envelope: &Envelope<'_, T>,
    pretty: bool,
) -> Result<(), OutputError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, envelope)?;
    } else {
        serde_json::to_writer(&mut *out, envelope)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes a success envelope carrying `data`.
///
/// # Errors
///
/// Returns [`OutputError`] when rendering or writing fails.
pub fn write_success<T: Serialize>(
    out: &mut impl Write,
    data: &T,
    pretty: bool,
) -> Result<(), OutputError> {
    write_envelope(
        out,
        &Envelope {
            ok: true,
            data: Some(data),
            error: None,
        },
        pretty,
    )
}

/// Writes a failure envelope carrying `message`.
///
/// # Errors
///
/// Returns [`OutputError`] when rendering or writing fails.
pub fn write_failure(out: &mut impl Write, message: &str, pretty: bool) -> Result<(), OutputError> {
    write_envelope::<()>(
        out,
        &Envelope {
            ok: false,
            data: None,
            error: Some(message),
        },
        pretty,
    )
}
