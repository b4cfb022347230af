//! Scroll-to-start controller.
//!
//! The chat list is virtualized: older messages only exist on the page once
//! they have been scrolled into view. The controller presses "up" on the
//! scroll container until the day before the requested start date shows up,
//! so every message of the start date is rendered below it.

use crate::domain::{
    AppError, DateBoundary, DocumentQuery, Lookup, NavKey, Result, SelectorConfig,
};

use super::boundary::find_text;

/// Outcome of a completed scroll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollReport {
    /// The `DD/MM/YYYY` text that stopped the scroll.
    pub anchor: String,
    /// Number of upward key presses delivered.
    pub scrolls: u64,
}

/// Locates the chat's scroll container, if it is on the page.
///
/// # Errors
/// Returns error if the session is lost.
pub fn scroll_container<Q: DocumentQuery>(
    query: &mut Q,
    selectors: &SelectorConfig,
) -> Result<Option<Q::Node>> {
    Ok(query
        .find_by_class(&selectors.scroll_container_class)?
        .into_iter()
        .next())
}

fn require_container<Q: DocumentQuery>(
    query: &mut Q,
    selectors: &SelectorConfig,
) -> Result<Q::Node> {
    scroll_container(query, selectors)?.ok_or_else(|| AppError::ElementMissing {
        class: selectors.scroll_container_class.clone(),
    })
}

/// Scrolls up until the day before `start` is visible.
///
/// With `max_attempts` set to `None` this loops until the anchor appears,
/// which never happens if the conversation does not reach back that far.
///
/// # Errors
/// Returns `ElementMissing` if there is no scroll container,
/// `BoundaryNotFound` if `max_attempts` presses did not reveal the anchor,
/// or any fatal session error.
pub fn scroll_to_date<Q: DocumentQuery>(
    query: &mut Q,
    selectors: &SelectorConfig,
    start: DateBoundary,
    max_attempts: Option<u64>,
) -> Result<ScrollReport> {
    let anchor = start.previous_day().formatted();
    let mut container = focus_container(query, selectors)?;

    tracing::info!(anchor = %anchor, "Scrolling back to start date");

    // `attempts` counts every press sent, delivered or not; `scrolls` only
    // the delivered ones.
    let mut attempts = 0u64;
    let mut scrolls = 0u64;
    loop {
        if find_text(query, &anchor)?.is_some() {
            tracing::info!(anchor = %anchor, scrolls, "Start anchor visible");
            return Ok(ScrollReport { anchor, scrolls });
        }

        if max_attempts.is_some_and(|limit| attempts >= limit) {
            return Err(AppError::BoundaryNotFound { anchor, attempts });
        }

        attempts += 1;
        match query.send_key(&container, NavKey::Up)? {
            Lookup::Found(()) => {
                scrolls += 1;
                tracing::trace!(scrolls, "Scrolled up");
            }
            Lookup::NotFound | Lookup::Invalidated => {
                tracing::debug!("Scroll container went stale, locating it again");
                container = focus_container(query, selectors)?;
            }
        }
    }
}

/// Locates the scroll container and clicks it so key presses scroll it.
fn focus_container<Q: DocumentQuery>(
    query: &mut Q,
    selectors: &SelectorConfig,
) -> Result<Q::Node> {
    let container = require_container(query, selectors)?;
    if query.click(&container)?.is_invalidated() {
        return require_container(query, selectors);
    }
    Ok(container)
}
