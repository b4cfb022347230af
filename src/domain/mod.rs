//! Domain layer - core types and the page capability interface.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (browser, files, etc.).

pub mod document;
pub mod error;
pub mod models;
pub mod settings;

pub use document::{DocumentQuery, Lookup, NavKey};
pub use error::{AppError, Result};
pub use models::{DateBoundary, ExportFormat, Extraction, ExtractionStats, MessageRecord};
pub use settings::{AppConfig, SelectorConfig, WebDriverConfig};
