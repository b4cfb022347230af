//! Application layer - traversal engine and export orchestration.
//!
//! This layer drives the rendered chat page through the `DocumentQuery`
//! capability and hands the collected records to a `RecordSink`.

pub mod boundary;
pub mod conversation;
pub mod exporter;
pub mod formatter;
pub mod scroller;
pub mod walker;

#[cfg(test)]
mod scripted_page;

pub use conversation::open_conversation;
pub use exporter::{sink_for, RecordSink};
pub use formatter::{format_records_table, format_stats};
pub use scroller::scroll_to_date;
pub use walker::collect_messages;
