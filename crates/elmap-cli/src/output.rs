//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for scripts, or
//! stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `ELMAP_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use elmap_core::{DisplayRecord, ErrorCode, MapError};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Tab-separated rows for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {} // unknown value, fall through to TTY detection
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, and TTY defaults.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("ELMAP_FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), is_tty)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// One record as a tab-separated row, prefixed with the list it belongs to.
pub fn text_record(w: &mut dyn Write, list: &str, record: &DisplayRecord) -> io::Result<()> {
    writeln!(
        w,
        "{list}\t{}\t{}\t{}\t{}",
        record.id,
        record.kind,
        record.title,
        record.url.as_deref().unwrap_or("-")
    )
}

/// A titled block of records for pretty output.
pub fn pretty_records(
    w: &mut dyn Write,
    heading: &str,
    records: &[DisplayRecord],
) -> io::Result<()> {
    pretty_section(w, &format!("{heading} ({})", records.len()))?;
    if records.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for record in records {
        writeln!(
            w,
            "  {:<14} {:<40} {}",
            record.icon,
            record.title,
            record.url.as_deref().unwrap_or("")
        )?;
    }
    writeln!(w)
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. `E1001`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    fn from_code(code: ErrorCode, message: String) -> Self {
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Commands attach an [`ErrorCode`] as context; library errors carry their
/// own. Anything else is reported as an internal error.
impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<ErrorCode>()
            .copied()
            .or_else(|| {
                err.chain().find_map(|cause| {
                    cause.downcast_ref::<MapError>().map(MapError::code).or_else(|| {
                        cause
                            .is::<rusqlite::Error>()
                            .then_some(ErrorCode::StoreQueryFailed)
                    })
                })
            })
            .unwrap_or(ErrorCode::InternalUnexpected);
        Self::from_code(code, format!("{err:#}"))
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn resolve_format_flag_wins_over_json_and_env() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_then_tty_default() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("JSON"), true),
            OutputMode::Json
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("bogus"), false),
            OutputMode::Text
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, true),
            OutputMode::Pretty
        );
    }

    #[test]
    fn text_record_is_tab_separated() {
        let record = DisplayRecord {
            id: 7,
            kind: "entry".to_string(),
            icon: "newspaper".to_string(),
            title: "Hello".to_string(),
            url: None,
        };
        let mut buf = Vec::new();
        text_record(&mut buf, "incoming", &record).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "incoming\t7\tentry\tHello\t-\n");
    }

    #[test]
    fn cli_error_picks_up_context_code() {
        let err = Err::<(), _>(anyhow::anyhow!("no such file"))
            .context(ErrorCode::StoreNotFound)
            .expect_err("error");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1001"));
        assert!(cli.message.contains("no such file"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn cli_error_maps_library_errors() {
        let err = anyhow::Error::new(MapError::Store(rusqlite::Error::InvalidQuery));
        assert_eq!(CliError::from(&err).error_code.as_deref(), Some("E2001"));

        let other = anyhow::anyhow!("boom");
        assert_eq!(CliError::from(&other).error_code.as_deref(), Some("E9001"));
    }
}
