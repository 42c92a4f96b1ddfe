//! Ticket Ledger — Entry Point
//!
//! Wiring sequence:
//! 1. Parse CLI arguments
//! 2. Load config (explicit `--config`, else `ticket-ledger.toml` if present)
//! 3. Init tracing (stderr, optional JSON)
//! 4. Run the subcommand against the CSV ledger

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ticket_ledger::adapters::cli::{self, Cli};
use ticket_ledger::config::{self, AppConfig};

fn main() -> Result<()> {
    // ── 1. Parse arguments ──────────────────────────────────
    let args = Cli::parse();

    // ── 2. Load configuration ───────────────────────────────
    let config = config::loader::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // ── 3. Initialize logging ───────────────────────────────
    init_tracing(&config);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        ledger = %config.ledger.path,
        "Starting ticket ledger"
    );

    // ── 4. Run ──────────────────────────────────────────────
    cli::run(args, &config)
}

/// Logs go to stderr so `export` can stream CSV on stdout.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
