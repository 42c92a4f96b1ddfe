//! CLI Adapter - Command Line Front End
//!
//! Each subcommand is one interaction: open the store, run a single
//! ledger operation, print the result. `serve` hands the opened store
//! to the HTTP adapter instead.

pub mod render;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;

use crate::adapters::http;
use crate::adapters::metrics::LedgerMetrics;
use crate::adapters::persistence::CsvLedgerFile;
use crate::config::AppConfig;
use crate::domain::summary::LedgerSummary;
use crate::domain::ticket::NewTicket;
use crate::ports::repository::LedgerRepository;
use crate::usecases::ledger_store::LedgerStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ticket resale expense and profit tracker")]
pub struct Cli {
    /// Config file (defaults to ticket-ledger.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Ledger CSV file, overriding the configured path
    #[arg(long, global = true, env = "TICKET_LEDGER_FILE")]
    pub ledger: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a ticket purchase and resale
    Add {
        /// Match name
        #[arg(long = "match", default_value = "")]
        match_name: String,
        /// Stand name
        #[arg(long, default_value = "")]
        stand: String,
        /// Price paid per ticket
        #[arg(long, allow_negative_numbers = true)]
        purchase_price: Decimal,
        /// Price received per ticket
        #[arg(long, allow_negative_numbers = true)]
        selling_price: Decimal,
        /// Number of tickets
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Erase every transaction (irreversible)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Print the transaction history
    Show,
    /// Print total profit and the match/stand breakdowns
    Summary,
    /// Write the ledger CSV to a file or stdout
    Export {
        /// Destination file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Serve the JSON API, health probes and metrics
    Serve {
        /// Bind address, overriding the configured one
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Open the configured ledger and run the parsed command.
pub fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let path = cli
        .ledger
        .unwrap_or_else(|| PathBuf::from(&config.ledger.path));

    let (mut store, _repair) = LedgerStore::open(CsvLedgerFile::new(&path))
        .with_context(|| format!("Failed to open ledger {}", path.display()))?;

    if let Command::Serve { bind } = cli.command {
        let bind = bind.unwrap_or_else(|| config.server.bind_address.clone());
        return serve(store, &bind);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &mut store, config, &mut out)
}

/// Run one non-server command against an open store.
///
/// # Errors
/// Validation and storage failures, unconfirmed resets, and write
/// failures on `out` or the export destination.
pub fn execute<R, W>(
    command: &Command,
    store: &mut LedgerStore<R>,
    config: &AppConfig,
    out: &mut W,
) -> Result<()>
where
    R: LedgerRepository,
    W: Write,
{
    let symbol = config.ledger.currency_symbol.as_str();
    match command {
        Command::Add {
            match_name,
            stand,
            purchase_price,
            selling_price,
            quantity,
        } => {
            let ticket = NewTicket::new(
                match_name.clone(),
                stand.clone(),
                *purchase_price,
                *selling_price,
                *quantity,
            );
            let ledger = store.append(ticket).context("Ticket not added")?;
            let profit = ledger
                .last()
                .map(|row| row.profit_or_zero())
                .unwrap_or_default();
            writeln!(
                out,
                "Ticket added (row {}, profit {})",
                ledger.len(),
                render::money(symbol, profit)
            )?;
        }
        Command::Reset { yes } => {
            anyhow::ensure!(
                *yes,
                "Reset erases all {} transactions; re-run with --yes to confirm",
                store.ledger().len()
            );
            store.reset().context("Reset failed")?;
            writeln!(out, "All data erased. Ready to start fresh.")?;
        }
        Command::Show => {
            write!(out, "{}", render::render_ledger(store.ledger()))?;
        }
        Command::Summary => {
            let summary =
                LedgerSummary::compute(store.ledger()).context("Summary failed")?;
            write!(out, "{}", render::render_summary(&summary, symbol))?;
        }
        Command::Export { output } => {
            let bytes = store.export().context("Export failed")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), rows = store.ledger().len(), "Ledger exported");
                }
                None => out.write_all(&bytes)?,
            }
        }
        Command::Serve { .. } => anyhow::bail!("serve must be run through `run`"),
    }
    Ok(())
}

/// Serve the HTTP API on a fresh tokio runtime until Ctrl-C.
fn serve(store: LedgerStore<CsvLedgerFile>, bind: &str) -> Result<()> {
    let metrics = LedgerMetrics::new().context("Failed to register metrics")?;
    let state = http::AppState::new(store, metrics);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(http::serve(state, bind, async {
        let _ = tokio::signal::ctrl_c().await;
    }))
}
