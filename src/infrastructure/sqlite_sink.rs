//! `SQLite` export into a single `chat(info, message)` table.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::application::RecordSink;
use crate::domain::{AppError, MessageRecord, Result};

/// Writes records into a fresh `SQLite` database file.
pub struct SqliteSink {
    path: PathBuf,
}

impl SqliteSink {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Replaces any previous export and creates the schema.
    fn create(&self) -> Result<Connection> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                AppError::io(format!("Failed to replace {}", self.path.display()), e)
            })?;
        }

        let conn = Connection::open(&self.path).map_err(AppError::database)?;

        conn.execute_batch("CREATE TABLE chat (info TEXT, message TEXT);")
            .map_err(AppError::database)?;

        Ok(conn)
    }
}

impl RecordSink for SqliteSink {
    fn write(&mut self, _participant: &str, records: &[MessageRecord]) -> Result<usize> {
        let conn = self.create()?;

        // Autocommit mode: each insert is its own transaction.
        let mut stmt = conn
            .prepare("INSERT INTO chat (info, message) VALUES (?1, ?2)")
            .map_err(AppError::database)?;

        for record in records {
            stmt.execute(params![record.metadata, record.text])
                .map_err(AppError::database)?;
        }
        drop(stmt);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM chat", [], |row| row.get(0))
            .map_err(AppError::database)?;

        tracing::info!(path = %self.path.display(), rows = count, "SQLite export written");

        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}
