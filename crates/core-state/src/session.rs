//! Multi-document session: the ordered tab collection and the active index.
//!
//! Invariant: `active` is a valid index whenever `tabs` is non-empty.
//! Closing the last tab leaves the session empty, a distinct terminal state
//! the application observes and exits from; no accessor is called after that.

use crate::document::Document;
use std::path::Path;
use tracing::debug;

/// Close marker rendered after each tab name; clicks on it close the tab.
pub const TAB_CLOSE_LABEL: &str = "x|";

pub struct Session {
    tabs: Vec<Document>,
    active: usize,
}

impl Session {
    pub fn new(initial: Document) -> Self {
        Self {
            tabs: vec![initial],
            active: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn tabs(&self) -> &[Document] {
        &self.tabs
    }

    /// Borrow the active document. Must not be called on an empty session.
    pub fn active(&self) -> &Document {
        debug_assert!(self.active < self.tabs.len(), "active index in range");
        &self.tabs[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Document {
        debug_assert!(self.active < self.tabs.len(), "active index in range");
        &mut self.tabs[self.active]
    }

    /// Switch to tab `i`. Out-of-range indices are ignored.
    pub fn switch(&mut self, i: usize) {
        if i < self.tabs.len() {
            self.active = i;
            debug!(target: "state.session", tab = i, "switch_tab");
        }
    }

    /// Append a new tab and make it active.
    pub fn push_tab(&mut self, doc: Document) {
        self.tabs.push(doc);
        self.active = self.tabs.len() - 1;
    }

    /// Close tab `index`, keeping `active` valid. The session may become
    /// empty; the caller decides whether that ends the program.
    pub fn close(&mut self, index: usize) {
        if index >= self.tabs.len() {
            return;
        }
        self.tabs.remove(index);
        debug!(target: "state.session", tab = index, remaining = self.tabs.len(), "close_tab");
        if self.tabs.is_empty() {
            self.active = 0;
            return;
        }
        if index < self.active {
            self.active -= 1;
        } else if index == self.active && self.active >= self.tabs.len() {
            self.active = self.tabs.len() - 1;
        }
    }

    /// Index of the tab backed by `path`, if it is already open.
    pub fn find_path(&self, path: &Path) -> Option<usize> {
        self.tabs
            .iter()
            .position(|t| t.file_name.as_deref() == Some(path))
    }
}
