//! Ledger Store - Load, Append, Reset
//!
//! Owns the in-memory ledger and mirrors it to the repository after
//! every mutation. Each mutation writes the full table first and only
//! then swaps in the new in-memory state, so a failed write leaves both
//! the file and the store as they were.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::error::ValidationError;
use crate::domain::ledger::{Ledger, SchemaRepair};
use crate::domain::summary::LedgerSummary;
use crate::domain::ticket::NewTicket;
use crate::ports::repository::{LedgerRepository, StorageError};

/// Failure of a ledger store operation.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// In-memory ledger mirrored to a `LedgerRepository`.
pub struct LedgerStore<R> {
    repo: R,
    ledger: Ledger,
}

impl<R: LedgerRepository> LedgerStore<R> {
    /// Open the store, loading (or initializing) persistent storage.
    ///
    /// # Errors
    /// `LedgerError::Storage` if the table cannot be read or, on first
    /// use, the empty table cannot be written.
    pub fn open(repo: R) -> Result<(Self, SchemaRepair), LedgerError> {
        let mut store = Self {
            repo,
            ledger: Ledger::new(),
        };
        let repair = store.load()?;
        Ok((store, repair))
    }

    /// Re-read storage, replacing the in-memory ledger.
    ///
    /// Missing storage is created with zero rows. Extra columns are
    /// dropped and missing columns backfilled; the returned
    /// `SchemaRepair` says what changed.
    #[instrument(skip(self), fields(location = %self.repo.location()))]
    pub fn load(&mut self) -> Result<SchemaRepair, LedgerError> {
        let Some(table) = self.repo.read_table()? else {
            let empty = Ledger::new();
            self.repo.write_table(&empty.to_table())?;
            self.ledger = empty;
            info!("Initialized empty ledger");
            return Ok(SchemaRepair::default());
        };

        let (ledger, repair) = Ledger::from_table(&table);
        if !repair.is_clean() {
            let backfilled: Vec<String> =
                repair.backfilled.iter().map(ToString::to_string).collect();
            warn!(
                dropped = ?repair.dropped,
                backfilled = %backfilled.join(", "),
                coerced_cells = repair.coerced_cells,
                "Ledger schema repaired on load"
            );
        }
        info!(rows = ledger.len(), "Ledger loaded");
        self.ledger = ledger;
        Ok(repair)
    }

    /// Current ledger snapshot.
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Validate `ticket`, append it, and persist the full ledger.
    ///
    /// # Errors
    /// `Validation` before any I/O for out-of-range input, including a
    /// row that would push any summary total out of decimal range;
    /// `Storage` if the write fails, in which case the ledger is unchanged.
    #[instrument(skip(self, ticket), fields(match_name = %ticket.match_name, stand = %ticket.stand))]
    pub fn append(&mut self, ticket: NewTicket) -> Result<&Ledger, LedgerError> {
        let sale = ticket.into_sale()?;
        let next = self.ledger.with_appended(sale);
        LedgerSummary::compute(&next).map_err(|_| ValidationError::TotalsOverflow)?;
        self.repo.write_table(&next.to_table())?;
        self.ledger = next;

        if let Some(row) = self.ledger.last() {
            info!(
                rows = self.ledger.len(),
                profit = ?row.profit,
                "Ticket appended"
            );
        }
        Ok(&self.ledger)
    }

    /// Replace storage with an empty ledger. Irreversible.
    ///
    /// # Errors
    /// `Storage` if the write fails, in which case the ledger is unchanged.
    #[instrument(skip(self), fields(location = %self.repo.location()))]
    pub fn reset(&mut self) -> Result<&Ledger, LedgerError> {
        let empty = Ledger::new();
        self.repo.write_table(&empty.to_table())?;
        let discarded = std::mem::replace(&mut self.ledger, empty);
        warn!(discarded_rows = discarded.len(), "Ledger reset");
        Ok(&self.ledger)
    }

    /// Current ledger in storage format, for download.
    ///
    /// # Errors
    /// `Storage` if serialization fails.
    pub fn export(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(self.repo.encode_table(&self.ledger.to_table())?)
    }

    pub fn is_healthy(&self) -> bool {
        self.repo.is_healthy()
    }
}
