//! Set Audit CLI - drive reconciliation passes against the audit ledger
//!
//! This CLI gives operators a terminal interface to:
//! - Reconcile a live selection-set snapshot into the ledger
//! - Inspect ledger rows and headers
//! - Upgrade a legacy ledger file in place
//! - Record ignore decisions on individual sets

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{hash, ignore, ledger, sync};
pub use crate::config::{LedgerConfig, LoggingConfig, SetauditConfig};
pub use crate::error::{CliError, CliResult};
pub use crate::output::OutputFormat;

/// Set Audit CLI application
#[derive(Parser)]
#[command(name = "setaudit")]
#[command(about = "Set Audit - selection set audit ledger", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SETAUDIT_CONFIG")]
    config: Option<String>,

    /// Ledger CSV path (same variable as the `ledger.path` config key)
    #[arg(short, long, env = "SETAUDIT_LEDGER__PATH")]
    ledger: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "SETAUDIT_LOGGING__LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    json: bool,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Reconcile a live snapshot into the ledger
    Sync(sync::SyncArgs),

    /// Show ledger rows
    Show {
        /// Only rows with this audit status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show the ledger header row
    Headers,

    /// Rewrite the ledger in the current schema
    Migrate,

    /// Print the membership hash of element ids
    Hash {
        /// Element ids, in any order
        #[arg(allow_negative_numbers = true)]
        ids: Vec<i64>,
    },

    /// Mark a set as ignored
    Ignore {
        /// Set identity
        set_id: String,

        /// Why the set is ignored
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Clear the ignore mark on a set
    Unignore {
        /// Set identity
        set_id: String,
    },
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let mut config = SetauditConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.ledger {
        config.ledger.path = path;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    init_tracing(&config.logging);

    match cli.command {
        Commands::Sync(args) => sync::execute(args, &config.ledger, cli.output),
        Commands::Show { status } => ledger::show(status, &config.ledger, cli.output),
        Commands::Headers => ledger::headers(&config.ledger, cli.output),
        Commands::Migrate => ledger::migrate(&config.ledger, cli.output),
        Commands::Hash { ids } => hash::execute(ids, cli.output),
        Commands::Ignore { set_id, reason } => {
            ignore::execute(&set_id, true, reason, &config.ledger)
        }
        Commands::Unignore { set_id } => ignore::execute(&set_id, false, None, &config.ledger),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    // Logs go to stderr so structured output on stdout stays parseable.
    if logging.json {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }
}
