//! Domain models for extracted chat data.
//!
//! These models represent what the traversal engine reads out of the
//! rendered conversation and hands to an export sink.

use chrono::{Days, NaiveDate};

/// Date format used by the chat client in message metadata (`DD/MM/YYYY`).
pub const METADATA_DATE_FORMAT: &str = "%d/%m/%Y";

/// A single message read from the rendered conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Sender and timestamp text as rendered by the chat client,
    /// e.g. `[14:02, 03/03/2024] Alice: `.
    pub metadata: String,
    /// The message body.
    pub text: String,
}

impl MessageRecord {
    #[must_use]
    pub fn new(metadata: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            metadata: metadata.into(),
            text: text.into(),
        }
    }

    /// Whether this message's metadata mentions the given participant.
    #[must_use]
    pub fn is_from(&self, participant: &str) -> bool {
        self.metadata.contains(participant)
    }
}

/// A calendar date used to anchor or stop traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateBoundary(NaiveDate);

impl DateBoundary {
    /// The date as it appears in message metadata.
    #[must_use]
    pub fn formatted(self) -> String {
        self.0.format(METADATA_DATE_FORMAT).to_string()
    }

    /// The day before this one, used as the scroll anchor for a start boundary.
    ///
    /// Saturates at the earliest representable date.
    #[must_use]
    pub fn previous_day(self) -> Self {
        Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
    }
}

impl From<NaiveDate> for DateBoundary {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for DateBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

/// Counters collected while walking the rendered message list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Message nodes visited before the walk stopped.
    pub nodes_seen: usize,
    /// Nodes skipped because their visible text was empty.
    pub skipped_empty: usize,
    /// Nodes skipped because they carried no metadata attribute.
    pub skipped_untagged: usize,
    /// Nodes lost because the page discarded them mid-walk.
    pub invalidated: usize,
    /// Recovery scrolls actually delivered to the scroll container.
    pub recovery_scrolls: usize,
    /// Whether the end-date boundary node was observed.
    pub boundary_reached: bool,
}

/// Ordered output of one forward walk.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Records in document order, boundary node excluded.
    pub records: Vec<MessageRecord>,
    pub stats: ExtractionStats,
}

impl Extraction {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Durable formats an extraction can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Word document with one formatted paragraph pair per message.
    Document,
    /// CSV table with `info,message` columns.
    Csv,
    /// `SQLite` database with a single `chat` table.
    Sqlite,
}

impl ExportFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Document => "docx",
            Self::Csv => "csv",
            Self::Sqlite => "db",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docx" | "doc" | "document" | "1" => Ok(Self::Document),
            "csv" | "2" => Ok(Self::Csv),
            "sqlite" | "db" | "3" => Ok(Self::Sqlite),
            _ => Err(format!("Unknown format: {s}. Use: docx, csv, sqlite")),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document => write!(f, "Document"),
            Self::Csv => write!(f, "CSV"),
            Self::Sqlite => write!(f, "SQLite"),
        }
    }
}
