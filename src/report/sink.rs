//! # CSV Sink
//!
//! Owns the report file for the duration of a run. The file is truncated and
//! the header written as soon as the sink is created, so even a run that fails
//! before its first row leaves a valid, header-only CSV behind.
//!
//! `finish` flushes, syncs and closes the file and must be called on every exit path;
//! the `Reporter` does this for both successful and failed runs.

use crate::error::{ReportError, Result};
use crate::report::row::{NameFormat, ReportRow};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows_written: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("path", &self.path)
            .field("rows_written", &self.rows_written)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Truncate (or create) `path` and write the header row
    ///
    /// # Errors
    /// Returns `ReportError::Sink` if the file cannot be opened or the header written
    pub fn create(path: impl Into<PathBuf>, format: NameFormat) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| ReportError::Sink {
            path: path.clone(),
            source,
        })?;

        let writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        let mut sink = Self {
            path,
            writer,
            rows_written: 0,
        };
        sink.write_record(format.header())?;
        Ok(sink)
    }

    /// Append one data row
    ///
    /// # Errors
    /// Returns `ReportError::Sink` if the row cannot be written
    pub fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        self.write_record(row.fields())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Push buffered rows to the file
    ///
    /// # Errors
    /// Returns `ReportError::Sink` if the flush fails
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| self.error(source))
    }

    /// Flush, sync and close the file, returning the number of data rows written
    ///
    /// # Errors
    /// Returns `ReportError::Sink` if the final flush or sync fails
    pub fn finish(self) -> Result<usize> {
        let Self {
            path,
            writer,
            rows_written,
        } = self;

        let file = writer.into_inner().map_err(|e| ReportError::Sink {
            path: path.clone(),
            source: e.into_error(),
        })?;
        file.sync_all()
            .map_err(|source| ReportError::Sink { path, source })?;

        Ok(rows_written)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_record(&mut self, record: [&str; 5]) -> Result<()> {
        self.writer
            .write_record(record)
            .map_err(|e| self.error(io::Error::from(e)))
    }

    fn error(&self, source: io::Error) -> ReportError {
        ReportError::Sink {
            path: self.path.clone(),
            source,
        }
    }
}
