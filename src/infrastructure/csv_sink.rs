//! CSV export: one `info,message` row per message.

use std::path::{Path, PathBuf};

use crate::application::RecordSink;
use crate::domain::{AppError, MessageRecord, Result};

const HEADER: [&str; 2] = ["info", "message"];

/// Writes records as a flat CSV table.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Counts data rows in the written file.
    fn count_rows(&self) -> Result<usize> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| AppError::export("Failed to reopen CSV file", e))?;

        let mut rows = 0;
        for record in reader.records() {
            record.map_err(|e| AppError::export("Failed to read back CSV row", e))?;
            rows += 1;
        }
        Ok(rows)
    }
}

impl RecordSink for CsvSink {
    fn write(&mut self, _participant: &str, records: &[MessageRecord]) -> Result<usize> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| {
            AppError::export(format!("Failed to create {}", self.path.display()), e)
        })?;

        writer
            .write_record(HEADER)
            .map_err(|e| AppError::export("Failed to write CSV header", e))?;

        for record in records {
            writer
                .write_record([record.metadata.as_str(), record.text.as_str()])
                .map_err(|e| AppError::export("Failed to write CSV row", e))?;
        }

        writer
            .flush()
            .map_err(|e| AppError::io("Failed to flush CSV file", e))?;
        drop(writer);

        let written = self.count_rows()?;
        tracing::info!(path = %self.path.display(), rows = written, "CSV export written");
        Ok(written)
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}
