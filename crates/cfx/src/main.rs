//! cfx CLI - Confluence tool gateway.
//!
//! Provides commands for:
//! - `tools`: List available tools and their argument schemas
//! - `call`: Call one tool with JSON arguments
//! - `serve`: Answer JSON tool requests line by line on stdin/stdout

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use cfx_config::{CliSettings, Config, LoggingConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CallArgs, ToolsArgs};
use error::CliError;
use output::Output;

/// cfx - Confluence tool gateway.
#[derive(Parser)]
#[command(name = "cfx", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover cfx.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (info-level logs on stderr).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Confluence base URL (overrides config).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-request HTTP timeout in seconds (overrides config).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Maximum attempts per Confluence call (overrides config).
    #[arg(long, global = true)]
    retries: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tools.
    Tools(ToolsArgs),
    /// Call a single tool and print its result.
    Call(CallArgs),
    /// Serve tool requests as JSON lines on stdin/stdout.
    Serve,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    if let Err(err) = run(cli) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = CliSettings {
        base_url: cli.url,
        timeout_secs: cli.timeout,
        max_attempts: cli.retries,
    };
    let config = Config::load(cli.config.as_deref(), Some(&settings))?;

    init_tracing(cli.verbose, &config.logging);

    match cli.command {
        Commands::Tools(args) => args.execute(),
        Commands::Call(args) => runtime()?.block_on(args.execute(&config)),
        Commands::Serve => runtime()?.block_on(commands::serve::execute(&config)),
    }
}

/// Install the stderr subscriber.
///
/// `--verbose` enables INFO level, otherwise `RUST_LOG` wins over the
/// configured level.
fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.filter()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Runtime::new()?)
}
