//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{AppError, DateBoundary, ExportFormat, Result};

/// Accepted spellings for date arguments.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// WhatsApp Chat Export - Save a date range of a WhatsApp Web conversation.
///
/// The dates must both appear in the chat.
#[derive(Parser, Debug)]
#[command(name = "whatsapp-chat-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export messages from one conversation.
    Export {
        /// Contact name as shown in the chat list.
        contact: String,

        /// First day to export (YYYY-MM-DD or MM/DD/YYYY).
        #[arg(long)]
        from: String,

        /// Day to stop at, not included (YYYY-MM-DD or MM/DD/YYYY).
        #[arg(long)]
        to: String,

        /// Output format: docx, csv, or sqlite.
        #[arg(short, long, default_value = "docx")]
        format: String,

        /// Output directory (overrides the config file).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// WebDriver server URL (overrides the config file).
        #[arg(long)]
        webdriver_url: Option<String>,

        /// Give up after this many scroll presses (overrides the config file).
        #[arg(long)]
        max_scrolls: Option<u64>,

        /// Print a table of the extracted messages before writing.
        #[arg(long)]
        preview: bool,
    },

    /// Create the config file if missing and show it.
    Config,
}

/// Validated inputs of an export run.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: DateBoundary,
    pub end: DateBoundary,
}

impl DateRange {
    /// Parses both ends and checks that `from` is strictly before `to`.
    ///
    /// # Errors
    /// Returns error if a date does not parse or the range is empty.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let start = parse_date(from)?;
        let end = parse_date(to)?;

        if start >= end {
            return Err(AppError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self { start, end })
    }
}

/// Parses a date argument.
///
/// # Errors
/// Returns error if no accepted format matches.
pub fn parse_date(input: &str) -> Result<DateBoundary> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(DateBoundary::from)
        .ok_or_else(|| AppError::InvalidDate {
            input: input.to_string(),
        })
}

/// Parses the export format argument.
///
/// # Errors
/// Returns error if the format is unknown.
pub fn parse_format(input: &str) -> Result<ExportFormat> {
    input
        .parse()
        .map_err(|message| AppError::Config { message })
}
