//! Console output for extraction results.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExtractionStats, MessageRecord};

/// Formats a preview table of extracted messages.
pub fn format_records_table(records: &[MessageRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Info", "Message"]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            truncate(record.metadata.trim(), 32),
            truncate(&record.text, 60),
        ]);
    }

    table.to_string()
}

/// Formats walk statistics for display.
pub fn format_stats(stats: &ExtractionStats) -> String {
    let boundary = if stats.boundary_reached {
        "reached".green()
    } else {
        "not seen".yellow()
    };

    format!(
        "{}\n  Nodes examined: {}\n  Empty skipped: {}\n  Untagged skipped: {}\n  Lost to re-render: {}\n  Recovery scrolls: {}\n  End date: {}",
        "📊 Statistics".bold(),
        stats.nodes_seen.to_string().cyan(),
        stats.skipped_empty.to_string().cyan(),
        stats.skipped_untagged.to_string().cyan(),
        stats.invalidated.to_string().red(),
        stats.recovery_scrolls.to_string().yellow(),
        boundary
    )
}

/// Truncates a string to max length (in characters) with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("first\nsecond", 20), "first");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_records_table_lists_every_record() {
        let records = vec![
            MessageRecord::new("[10:00, 01/03/2024] Alice: ", "hi"),
            MessageRecord::new("[10:01, 01/03/2024] Me: ", "hello"),
        ];
        let table = format_records_table(&records);
        assert!(table.contains("Alice"));
        assert!(table.contains("hello"));
    }
}
