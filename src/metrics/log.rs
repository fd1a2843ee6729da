//! Append-only CSV population log

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::metrics::PopulationRecord;

/// Writes one CSV row per tick.
///
/// Opening the file can fail and is reported to the caller. A failed row
/// write afterwards only logs a warning and bumps `failed_writes`; the
/// simulation keeps going.
pub struct PopulationLog {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: usize,
    failed_writes: usize,
}

impl PopulationLog {
    /// Create (truncating) the file and write the header
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", PopulationRecord::csv_header())?;

        tracing::info!("Logging population to {}", path.display());
        Ok(Self {
            path,
            writer,
            rows: 0,
            failed_writes: 0,
        })
    }

    /// Like `create`, but a file that cannot be opened only logs a warning.
    ///
    /// Callers run without a log when this returns `None`.
    pub fn create_or_warn(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::create(path) {
            Ok(log) => Some(log),
            Err(e) => {
                tracing::warn!(
                    "Cannot open population log {}: {}; continuing without it",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn record(&mut self, record: &PopulationRecord) {
        match writeln!(self.writer, "{}", record.to_csv_row()) {
            Ok(()) => self.rows += 1,
            Err(e) => {
                self.failed_writes += 1;
                tracing::warn!(
                    "Failed to log tick {} to {}: {}",
                    record.tick,
                    self.path.display(),
                    e
                );
            }
        }
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            self.failed_writes += 1;
            tracing::warn!("Failed to flush {}: {}", self.path.display(), e);
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PopulationLog {
    fn drop(&mut self) {
        self.flush();
    }
}
