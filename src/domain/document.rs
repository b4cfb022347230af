//! Capability interface over the live, client-rendered chat page.
//!
//! The traversal engine only ever talks to the page through [`DocumentQuery`].
//! Lookups report absence and staleness as values so callers can branch on
//! them with an ordinary `match`; `Err` is reserved for fatal session failures.

use super::error::Result;

/// Outcome of a single query against the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The query succeeded.
    Found(T),
    /// Nothing on the page matched the query.
    NotFound,
    /// The element reference was discarded by the page since it was obtained.
    Invalidated,
}

impl<T> Lookup<T> {
    /// Converts into an `Option`, folding both failure outcomes into `None`.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::Invalidated => None,
        }
    }

    pub const fn is_invalidated(&self) -> bool {
        matches!(self, Self::Invalidated)
    }
}

/// Navigation keys the engine sends to the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
}

/// Queries and actions against an already-opened conversation view.
///
/// Implementations own the browser session; the engine borrows it for the
/// duration of an export and never creates or tears it down.
pub trait DocumentQuery {
    /// Handle to an element on the page.
    type Node: Clone;

    /// All elements carrying the given class, in document order.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn find_by_class(&mut self, class: &str) -> Result<Vec<Self::Node>>;

    /// First element whose own text contains `needle`.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn find_by_text(&mut self, needle: &str) -> Result<Lookup<Self::Node>>;

    /// Visible text of an element.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn text(&mut self, node: &Self::Node) -> Result<Lookup<String>>;

    /// Attribute value of an element, `None` when the attribute is absent.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn attribute(&mut self, node: &Self::Node, name: &str) -> Result<Lookup<Option<String>>>;

    /// Clicks an element.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn click(&mut self, node: &Self::Node) -> Result<Lookup<()>>;

    /// Types literal text into an element.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn type_text(&mut self, node: &Self::Node, text: &str) -> Result<Lookup<()>>;

    /// Sends a navigation key to an element.
    ///
    /// # Errors
    /// Returns error if the session is lost.
    fn send_key(&mut self, node: &Self::Node, key: NavKey) -> Result<Lookup<()>>;
}
