//! Infrastructure layer - external adapters (browser, export files, config).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod csv_sink;
pub mod docx_sink;
pub mod sqlite_sink;
pub mod webdriver;

pub use config::{ensure_config_exists, load_config};
pub use csv_sink::CsvSink;
pub use docx_sink::DocxSink;
pub use sqlite_sink::SqliteSink;
pub use webdriver::WebDriverDocument;
