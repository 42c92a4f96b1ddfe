//! CSV Ledger File - Flat File Ledger Persistence
//!
//! Stores the ledger as one CSV file with a header row. Writes are
//! atomic (write to a tmp sibling, then rename), so the file is always
//! either the old or the new table, never a partial write.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::domain::ledger::RawTable;
use crate::ports::repository::{LedgerRepository, StorageError};

/// CSV file adapter for the `LedgerRepository` port.
#[derive(Debug, Clone)]
pub struct CsvLedgerFile {
    /// Path to the ledger CSV.
    path: PathBuf,
    /// Temporary path for atomic writes.
    tmp_path: PathBuf,
}

impl CsvLedgerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        Self { path, tmp_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: io::Error) -> StorageError {
        StorageError::Write {
            location: self.location(),
            source,
        }
    }

    fn format_error(&self, err: &csv::Error) -> StorageError {
        StorageError::Format {
            location: self.location(),
            message: err.to_string(),
        }
    }
}

/// Parse CSV bytes into a raw table. Rows may be ragged.
pub fn decode_csv(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.iter().map(ToString::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(ToString::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Serialize a raw table as CSV with standard quoting.
pub fn encode_csv(table: &RawTable) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

impl LedgerRepository for CsvLedgerFile {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read_table(&self) -> Result<Option<RawTable>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No ledger file found");
                return Ok(None);
            }
            Err(source) => {
                return Err(StorageError::Read {
                    location: self.location(),
                    source,
                });
            }
        };

        let table = decode_csv(&bytes).map_err(|e| self.format_error(&e))?;
        debug!(
            columns = table.headers.len(),
            rows = table.rows.len(),
            "Ledger file read"
        );
        Ok(Some(table))
    }

    #[instrument(skip(self, table), fields(path = %self.path.display(), rows = table.rows.len()))]
    fn write_table(&self, table: &RawTable) -> Result<(), StorageError> {
        let bytes = encode_csv(table).map_err(|e| self.format_error(&e))?;

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;
        }

        // Write to tmp file
        let mut file = File::create(&self.tmp_path).map_err(|e| self.write_error(e))?;
        file.write_all(&bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| {
                let _ = fs::remove_file(&self.tmp_path);
                self.write_error(e)
            })?;

        // Atomic rename
        fs::rename(&self.tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&self.tmp_path);
            self.write_error(e)
        })?;

        debug!("Ledger file replaced");
        Ok(())
    }

    fn encode_table(&self, table: &RawTable) -> Result<Vec<u8>, StorageError> {
        encode_csv(table).map_err(|e| self.format_error(&e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// Probe by writing and removing a marker file next to the ledger.
    fn is_healthy(&self) -> bool {
        let mut probe = self.tmp_path.clone();
        probe.set_extension("health");
        let result = fs::write(&probe, b"ok");
        let _ = fs::remove_file(&probe);
        result.is_ok()
    }
}
