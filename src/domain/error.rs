//! Domain-level error types for whatsapp-chat-export.
//!
//! Only fatal conditions live here. "Not found" and "invalidated" are
//! ordinary query outcomes (see [`crate::domain::Lookup`]), not errors.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// The WebDriver session failed or answered with an unexpected error.
    #[error("WebDriver error: {message}")]
    WebDriver {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A structural element of the chat page could not be located.
    #[error("Element with class '{class}' not found on the page")]
    ElementMissing { class: String },

    /// The contact search produced no matching chat.
    #[error("Contact not found: {name}")]
    ContactNotFound { name: String },

    /// The scroll guard ran out before the anchor date became visible.
    #[error("Date {anchor} not found after {attempts} scroll actions")]
    BoundaryNotFound { anchor: String, attempts: u64 },

    /// Start date is not strictly earlier than the end date.
    #[error("Invalid date range: 'from' ({start}) must be earlier than 'to' ({end})")]
    InvalidDateRange { start: String, end: String },

    /// A date argument could not be parsed.
    #[error("Invalid date '{input}': use YYYY-MM-DD or MM/DD/YYYY")]
    InvalidDate { input: String },

    /// Failed to write or query the relational export.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to produce a document or table export.
    #[error("Export error: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a WebDriver transport error.
    pub fn webdriver(err: reqwest::Error) -> Self {
        Self::WebDriver {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a WebDriver protocol error without an underlying cause.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::WebDriver {
            message: message.into(),
            source: None,
        }
    }

    /// Create an export error with context.
    pub fn export<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Export {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
