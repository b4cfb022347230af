//! In-memory chat page for exercising the traversal engine in tests.

use std::collections::HashSet;

use crate::domain::{AppError, DocumentQuery, Lookup, NavKey, Result, SelectorConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNode {
    Message(usize),
    Container,
    SearchBox,
    Text(String),
}

#[derive(Debug, Clone)]
struct ScriptedMessage {
    text: String,
    metadata: Option<String>,
}

/// A scripted page: a fixed message snapshot, a scroll container, and an
/// anchor text that shows up after a set number of upward scrolls.
#[derive(Debug, Default)]
pub struct ScriptedPage {
    selectors: SelectorConfig,
    messages: Vec<ScriptedMessage>,
    stale: HashSet<usize>,
    stale_metadata: HashSet<usize>,
    broken: HashSet<usize>,
    anchor: Option<(String, usize)>,
    contacts: Vec<String>,
    has_container: bool,
    has_search_box: bool,
    stale_container_presses: usize,
    pub keys: Vec<NavKey>,
    pub typed: Vec<String>,
    pub clicks: Vec<PageNode>,
    pub text_reads: Vec<usize>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self {
            has_container: true,
            has_search_box: true,
            ..Self::default()
        }
    }

    pub fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }

    pub fn message(mut self, metadata: &str, text: &str) -> Self {
        self.messages.push(ScriptedMessage {
            text: text.into(),
            metadata: Some(metadata.into()),
        });
        self
    }

    pub fn untagged(mut self, text: &str) -> Self {
        self.messages.push(ScriptedMessage {
            text: text.into(),
            metadata: None,
        });
        self
    }

    /// Node `index` is discarded by the page before its text is read.
    pub fn stale_at(mut self, index: usize) -> Self {
        self.stale.insert(index);
        self
    }

    /// Node `index` is discarded between its text and metadata reads.
    pub fn stale_metadata_at(mut self, index: usize) -> Self {
        self.stale_metadata.insert(index);
        self
    }

    /// Reading node `index` fails as if the session had died.
    pub fn broken_at(mut self, index: usize) -> Self {
        self.broken.insert(index);
        self
    }

    /// `text` becomes findable once `after` upward scrolls have been sent.
    pub fn anchor(mut self, text: &str, after: usize) -> Self {
        self.anchor = Some((text.into(), after));
        self
    }

    pub fn contact(mut self, name: &str) -> Self {
        self.contacts.push(name.into());
        self
    }

    pub fn without_container(mut self) -> Self {
        self.has_container = false;
        self
    }

    pub fn without_search_box(mut self) -> Self {
        self.has_search_box = false;
        self
    }

    /// The next `presses` key presses on the container report it stale.
    pub fn stale_container(mut self, presses: usize) -> Self {
        self.stale_container_presses = presses;
        self
    }

    pub fn count_keys(&self, key: NavKey) -> usize {
        self.keys.iter().filter(|k| **k == key).count()
    }

    fn live_message(&self, node: &PageNode) -> Option<(usize, &ScriptedMessage)> {
        match node {
            PageNode::Message(i) => self.messages.get(*i).map(|m| (*i, m)),
            _ => None,
        }
    }
}

impl DocumentQuery for ScriptedPage {
    type Node = PageNode;

    fn find_by_class(&mut self, class: &str) -> Result<Vec<PageNode>> {
        let nodes = if class == self.selectors.message_class {
            (0..self.messages.len()).map(PageNode::Message).collect()
        } else if class == self.selectors.scroll_container_class && self.has_container {
            vec![PageNode::Container]
        } else if class == self.selectors.search_box_class && self.has_search_box {
            vec![PageNode::SearchBox]
        } else {
            Vec::new()
        };
        Ok(nodes)
    }

    fn find_by_text(&mut self, needle: &str) -> Result<Lookup<PageNode>> {
        if let Some((anchor, after)) = &self.anchor {
            if anchor.contains(needle) && self.count_keys(NavKey::Up) >= *after {
                return Ok(Lookup::Found(PageNode::Text(anchor.clone())));
            }
        }
        if let Some(name) = self.contacts.iter().find(|c| c.contains(needle)) {
            return Ok(Lookup::Found(PageNode::Text(name.clone())));
        }
        Ok(Lookup::NotFound)
    }

    fn text(&mut self, node: &PageNode) -> Result<Lookup<String>> {
        let Some((index, message)) = self.live_message(node) else {
            return Ok(Lookup::NotFound);
        };
        let text = message.text.clone();
        if self.broken.contains(&index) {
            return Err(AppError::protocol("session deleted"));
        }
        self.text_reads.push(index);
        if self.stale.contains(&index) {
            return Ok(Lookup::Invalidated);
        }
        Ok(Lookup::Found(text))
    }

    fn attribute(&mut self, node: &PageNode, name: &str) -> Result<Lookup<Option<String>>> {
        let Some((index, message)) = self.live_message(node) else {
            return Ok(Lookup::NotFound);
        };
        if self.stale_metadata.contains(&index) {
            return Ok(Lookup::Invalidated);
        }
        if name == self.selectors.metadata_attribute {
            Ok(Lookup::Found(message.metadata.clone()))
        } else {
            Ok(Lookup::Found(None))
        }
    }

    fn click(&mut self, node: &PageNode) -> Result<Lookup<()>> {
        self.clicks.push(node.clone());
        Ok(Lookup::Found(()))
    }

    fn type_text(&mut self, _node: &PageNode, text: &str) -> Result<Lookup<()>> {
        self.typed.push(text.into());
        Ok(Lookup::Found(()))
    }

    fn send_key(&mut self, node: &PageNode, key: NavKey) -> Result<Lookup<()>> {
        if *node == PageNode::Container && self.stale_container_presses > 0 {
            self.stale_container_presses -= 1;
            return Ok(Lookup::Invalidated);
        }
        self.keys.push(key);
        Ok(Lookup::Found(()))
    }
}
