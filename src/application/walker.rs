//! Forward extraction walker.
//!
//! Walks a single snapshot of the rendered message nodes in document order
//! and collects `(metadata, text)` records until the end-date boundary.
//!
//! The chat list re-renders while it is being read, so any node in the
//! snapshot may be discarded before we get to it. A discarded node is
//! abandoned, not retried: the walker nudges the list down once and moves
//! on to the next node. Messages lost this way are absent from the result.

use crate::domain::{
    DateBoundary, DocumentQuery, Extraction, Lookup, MessageRecord, NavKey, Result,
    SelectorConfig,
};

use super::boundary::matches_date;
use super::scroller::scroll_container;

/// What a single message node turned out to hold.
enum NodeContent {
    /// Structural placeholder with no visible text.
    Empty,
    /// Visible text but no metadata attribute.
    Untagged,
    Tagged(MessageRecord),
}

/// Collects messages from the current snapshot up to, not including, the
/// first message dated `end`.
///
/// A walk that runs out of nodes before seeing `end` still succeeds; the
/// result then covers only what was rendered.
///
/// # Errors
/// Returns error only for fatal session failures.
pub fn collect_messages<Q: DocumentQuery>(
    query: &mut Q,
    selectors: &SelectorConfig,
    end: DateBoundary,
) -> Result<Extraction> {
    let snapshot = query.find_by_class(&selectors.message_class)?;
    tracing::debug!(nodes = snapshot.len(), end = %end, "Took message snapshot");

    let mut extraction = Extraction::default();

    for (index, node) in snapshot.iter().enumerate() {
        extraction.stats.nodes_seen += 1;

        match read_node(query, node, &selectors.metadata_attribute)? {
            Lookup::Found(NodeContent::Empty) => extraction.stats.skipped_empty += 1,
            Lookup::Found(NodeContent::Untagged) => extraction.stats.skipped_untagged += 1,
            Lookup::Found(NodeContent::Tagged(record)) => {
                if matches_date(&record.metadata, end) {
                    tracing::debug!(index, "Reached end boundary");
                    extraction.stats.boundary_reached = true;
                    break;
                }
                extraction.records.push(record);
            }
            Lookup::NotFound | Lookup::Invalidated => {
                tracing::warn!(index, "Message discarded by the page, skipping it");
                extraction.stats.invalidated += 1;
                if nudge_down(query, selectors)? {
                    extraction.stats.recovery_scrolls += 1;
                }
            }
        }
    }

    if !extraction.stats.boundary_reached {
        tracing::warn!(
            end = %end,
            "End date never appeared; result may be incomplete"
        );
    }

    tracing::info!(
        records = extraction.records.len(),
        invalidated = extraction.stats.invalidated,
        "Collected messages"
    );

    Ok(extraction)
}

fn read_node<Q: DocumentQuery>(
    query: &mut Q,
    node: &Q::Node,
    metadata_attribute: &str,
) -> Result<Lookup<NodeContent>> {
    let text = match query.text(node)? {
        Lookup::Found(text) => text,
        Lookup::NotFound => return Ok(Lookup::NotFound),
        Lookup::Invalidated => return Ok(Lookup::Invalidated),
    };

    if text.is_empty() {
        return Ok(Lookup::Found(NodeContent::Empty));
    }

    let metadata = match query.attribute(node, metadata_attribute)? {
        Lookup::Found(metadata) => metadata,
        Lookup::NotFound => return Ok(Lookup::NotFound),
        Lookup::Invalidated => return Ok(Lookup::Invalidated),
    };

    Ok(Lookup::Found(match metadata {
        Some(metadata) if !metadata.is_empty() => {
            NodeContent::Tagged(MessageRecord::new(metadata, text))
        }
        _ => NodeContent::Untagged,
    }))
}

/// Best-effort recovery after a node was discarded. Returns whether a key
/// press reached the scroll container.
fn nudge_down<Q: DocumentQuery>(query: &mut Q, selectors: &SelectorConfig) -> Result<bool> {
    let Some(container) = scroll_container(query, selectors)? else {
        tracing::debug!("No scroll container to nudge");
        return Ok(false);
    };

    if query.click(&container)?.is_invalidated() {
        tracing::debug!("Scroll container went stale before recovery");
        return Ok(false);
    }

    match query.send_key(&container, NavKey::Down)? {
        Lookup::Found(()) => Ok(true),
        Lookup::NotFound | Lookup::Invalidated => {
            tracing::debug!("Recovery scroll did not reach the container");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::application::scripted_page::ScriptedPage;
    use crate::domain::AppError;

    fn day(d: u32) -> DateBoundary {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().into()
    }

    fn meta(d: u32) -> String {
        format!("[10:00, {:02}/03/2024] Alice: ", d)
    }

    fn march_page(days: std::ops::RangeInclusive<u32>) -> ScriptedPage {
        days.fold(ScriptedPage::new(), |page, d| {
            page.message(&meta(d), &format!("message {d}"))
        })
    }

    fn texts(extraction: &Extraction) -> Vec<&str> {
        extraction.records.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_collects_up_to_end_boundary() {
        let mut page = march_page(1..=6);
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(
            texts(&extraction),
            vec!["message 1", "message 2", "message 3", "message 4"]
        );
        assert!(extraction.stats.boundary_reached);
        assert_eq!(extraction.records[0].metadata, meta(1));
    }

    #[test]
    fn test_boundary_is_exclusive_and_terminal() {
        let mut page = ScriptedPage::new()
            .message(&meta(1), "before")
            .message("05/03/2024", "boundary")
            .message(&meta(2), "after");
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["before"]);
        assert_eq!(page.text_reads, vec![0, 1]);
        assert_eq!(extraction.stats.nodes_seen, 2);
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut page = ScriptedPage::new()
            .message(&meta(1), "one")
            .message(&meta(1), "")
            .message(&meta(2), "two");
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["one", "two"]);
        assert_eq!(extraction.stats.skipped_empty, 1);
    }

    #[test]
    fn test_untagged_node_is_not_terminal() {
        let mut page = ScriptedPage::new()
            .message(&meta(1), "one")
            .untagged("05/03/2024 quoted")
            .message(&meta(2), "two");
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["one", "two"]);
        assert_eq!(extraction.stats.skipped_untagged, 1);
        assert!(!extraction.stats.boundary_reached);
    }

    #[test]
    fn test_blank_metadata_counts_as_untagged() {
        let mut page = ScriptedPage::new()
            .message("", "no info")
            .message(&meta(2), "two");
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["two"]);
        assert_eq!(extraction.stats.skipped_untagged, 1);
    }

    #[test]
    fn test_invalidated_node_is_lost_and_recovered_once() {
        let mut page = march_page(1..=4).stale_at(2);
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["message 1", "message 2", "message 4"]);
        assert_eq!(extraction.stats.invalidated, 1);
        assert_eq!(extraction.stats.recovery_scrolls, 1);
        assert_eq!(page.count_keys(NavKey::Down), 1);
        assert_eq!(page.count_keys(NavKey::Up), 0);
        // The lost node is not read a second time.
        assert_eq!(page.text_reads, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_invalidated_metadata_is_lost() {
        let mut page = march_page(1..=3).stale_metadata_at(0);
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["message 2", "message 3"]);
        assert_eq!(page.count_keys(NavKey::Down), 1);
    }

    #[test]
    fn test_recovery_without_container_keeps_going() {
        let mut page = march_page(1..=3).stale_at(1).without_container();
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert_eq!(texts(&extraction), vec!["message 1", "message 3"]);
        assert_eq!(extraction.stats.invalidated, 1);
        assert_eq!(extraction.stats.recovery_scrolls, 0);
    }

    #[test]
    fn test_missing_boundary_returns_whole_snapshot() {
        let mut page = march_page(1..=3);
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(20)).unwrap();

        assert_eq!(extraction.len(), 3);
        assert!(!extraction.stats.boundary_reached);
    }

    #[test]
    fn test_empty_snapshot() {
        let mut page = ScriptedPage::new();
        let selectors = page.selectors().clone();

        let extraction = collect_messages(&mut page, &selectors, day(5)).unwrap();

        assert!(extraction.is_empty());
        assert_eq!(extraction.stats.nodes_seen, 0);
    }

    #[test]
    fn test_session_failure_propagates() {
        let mut page = march_page(1..=3).broken_at(1);
        let selectors = page.selectors().clone();

        let err = collect_messages(&mut page, &selectors, day(5)).unwrap_err();

        assert!(matches!(err, AppError::WebDriver { .. }));
    }
}
