#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "elmap: reference maps for CMS elements",
    long_about = None
)]
struct Cli {
    /// Host SQLite store. Falls back to `ELMAP_DB`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file. Defaults to the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn db_path(&self) -> Option<PathBuf> {
        self.db
            .clone()
            .or_else(|| env::var_os("ELMAP_DB").map(PathBuf::from))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Maps",
        about = "Show what references an element and what it references",
        after_help = "EXAMPLES:\n    # Map entry 42 at the primary site\n    elmap --db craft.sqlite3 map 42\n\n    # Map at the French site, as JSON\n    elmap map 42 --site 2 --json"
    )]
    Map(cmd::map::MapArgs),

    #[command(
        next_help_heading = "Maps",
        about = "List one side of an element's map",
        after_help = "EXAMPLES:\n    # Who links to asset 7?\n    elmap refs 7 --direction incoming\n\n    # Count outgoing references\n    elmap refs 42 -d outgoing --count"
    )]
    Refs(cmd::refs::RefsArgs),

    #[command(
        next_help_heading = "Store",
        about = "Show detected and effective host extensions"
    )]
    Extensions,

    #[command(
        next_help_heading = "Store",
        about = "Create a host store with the expected schema",
        after_help = "EXAMPLES:\n    # Empty store with every extension\n    elmap init-demo demo.sqlite3\n\n    # Seeded store without commerce\n    elmap init-demo demo.sqlite3 --sample --no-commerce"
    )]
    InitDemo(cmd::init_demo::InitDemoArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate zsh completions\n    elmap completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ELMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "elmap=debug,elmap_core=debug,info"
        } else {
            "elmap=info,elmap_core=info,warn"
        })
    });

    let format = env::var("ELMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let db = cli.db_path();
    let config = cli.config.as_deref();
    debug!(?db, ?config, ?output, "starting");

    let command_result = match &cli.command {
        Commands::Map(args) => cmd::map::run_map(args, db.as_deref(), config, output),
        Commands::Refs(args) => cmd::refs::run_refs(args, db.as_deref(), config, output),
        Commands::Extensions => cmd::extensions::run_extensions(db.as_deref(), config, output),
        Commands::InitDemo(args) => cmd::init_demo::run_init_demo(args, output),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    };

    if let Err(err) = command_result {
        output::render_error(output, &output::CliError::from(&err))?;
        std::process::exit(1);
    }

    Ok(())
}
