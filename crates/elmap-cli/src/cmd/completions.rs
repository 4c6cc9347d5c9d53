use anyhow::{Context, Result};
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Name completions are registered under. The package is `elmap-cli`, so
/// clap's derived command name is not the installed binary name.
const BIN_NAME: &str = "elmap";

/// Arguments for `elmap completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to emit a completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for `shell` on stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let stdout = io::stdout();
    write_completions(shell, command, &mut stdout.lock())
}

fn write_completions(
    shell: Shell,
    command: &mut clap::Command,
    out: &mut impl Write,
) -> Result<()> {
    generate(shell, command, BIN_NAME, out);
    out.flush()
        .with_context(|| format!("failed to write {shell} completions"))
}
