//! Export destinations for extracted messages.

use std::path::{Path, PathBuf};

use crate::domain::{AppError, ExportFormat, MessageRecord, Result};
use crate::infrastructure::{CsvSink, DocxSink, SqliteSink};

/// A durable destination for extracted records.
pub trait RecordSink {
    /// Writes `records` and returns how many were actually persisted.
    ///
    /// `participant` is the contact name; sinks that style messages by
    /// sender use it to tell the contact's messages from the user's.
    ///
    /// # Errors
    /// Returns error if the destination cannot be written.
    fn write(&mut self, participant: &str, records: &[MessageRecord]) -> Result<usize>;

    /// File the sink writes to.
    fn destination(&self) -> &Path;
}

/// Output file for a participant: `<dir>/<participant>-chat.<ext>`.
///
/// Path separators in the participant name are replaced with `-` so the
/// file always lands directly inside `dir`.
#[must_use]
pub fn export_path(dir: &Path, participant: &str, format: ExportFormat) -> PathBuf {
    let name: String = participant
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '-' } else { c })
        .collect();
    dir.join(format!("{name}-chat.{}", format.extension()))
}

/// Builds the sink for `format`, creating `dir` if needed.
///
/// # Errors
/// Returns error if the output directory cannot be created.
pub fn sink_for(format: ExportFormat, dir: &Path, participant: &str) -> Result<Box<dyn RecordSink>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create {}", dir.display()), e))?;

    let path = export_path(dir, participant, format);
    tracing::debug!(path = %path.display(), %format, "Selected export sink");

    Ok(match format {
        ExportFormat::Document => Box::new(DocxSink::new(path)),
        ExportFormat::Csv => Box::new(CsvSink::new(path)),
        ExportFormat::Sqlite => Box::new(SqliteSink::new(path)),
    })
}
