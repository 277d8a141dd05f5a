//! Reversible edit records with undo/redo stacks and edit coalescing.
//!
//! Coalescing policy: a new record merges into the armed top of the undo
//! stack only when all of these hold:
//! * same kind, and the kind is not [`EditKind::Replace`];
//! * same row;
//! * the top's timestamp is within [`COALESCE_WINDOW`] of now;
//! * the columns are contiguous: forward typing for inserts
//!   (`prev.col + prev.new_text.chars().count() == new.col`), backward
//!   deleting for deletes (`new.col == prev.col - new.old_text.chars().count()`,
//!   i.e. repeated backspace).
//!
//! Merging concatenates text and refreshes the timestamp, so one burst of
//! typing undoes as one step. Any cursor-only movement must call
//! [`Journal::disarm`] so unrelated edits never merge across a navigation.
//!
//! Column arithmetic is in codepoints; multi-line payloads embed `'\n'`.

use std::time::{Duration, Instant};
use tracing::trace;

/// Maximum age of the stack top for a new record to coalesce into it.
pub const COALESCE_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
    Replace,
}

/// One reversible edit against a line store.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub kind: EditKind,
    pub row: usize,
    pub col: usize,
    /// Text removed at (row, col); empty for pure inserts.
    pub old_text: String,
    /// Text inserted at (row, col); empty for pure deletes.
    pub new_text: String,
    at: Instant,
}

impl Edit {
    pub fn insert(row: usize, col: usize, text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            row,
            col,
            old_text: String::new(),
            new_text: text.into(),
            at: Instant::now(),
        }
    }

    pub fn delete(row: usize, col: usize, old: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            row,
            col,
            old_text: old.into(),
            new_text: String::new(),
            at: Instant::now(),
        }
    }

    pub fn replace(
        row: usize,
        col: usize,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            kind: EditKind::Replace,
            row,
            col,
            old_text: old.into(),
            new_text: new.into(),
            at: Instant::now(),
        }
    }

    /// Structural reverse: Insert and Delete swap text fields, Replace swaps
    /// old/new. Applying the reverse of an applied edit restores the prior
    /// content.
    pub fn reversed(&self) -> Edit {
        let (kind, old_text, new_text) = match self.kind {
            EditKind::Insert => (EditKind::Delete, self.new_text.clone(), String::new()),
            EditKind::Delete => (EditKind::Insert, String::new(), self.old_text.clone()),
            EditKind::Replace => (
                EditKind::Replace,
                self.new_text.clone(),
                self.old_text.clone(),
            ),
        };
        Edit {
            kind,
            row: self.row,
            col: self.col,
            old_text,
            new_text,
            at: self.at,
        }
    }
}

/// Undo/redo stacks plus the coalescing armed-flag for the current stack top.
#[derive(Debug, Default)]
pub struct Journal {
    undo: Vec<Edit>,
    redo: Vec<Edit>,
    /// True while the undo top may still absorb contiguous edits.
    armed: bool,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn last_recorded(&self) -> Option<&Edit> {
        self.undo.last()
    }

    /// Record a new edit, coalescing with the armed stack top when possible.
    /// Every recorded edit clears the redo stack.
    pub fn record(&mut self, e: Edit) {
        self.record_at(e, Instant::now());
    }

    pub(crate) fn record_at(&mut self, mut e: Edit, now: Instant) {
        if self.armed
            && let Some(prev) = self.undo.last_mut()
            && prev.kind == e.kind
            && prev.kind != EditKind::Replace
            && prev.row == e.row
            && now.duration_since(prev.at) < COALESCE_WINDOW
        {
            match e.kind {
                EditKind::Insert
                    if prev.col + prev.new_text.chars().count() == e.col =>
                {
                    prev.new_text.push_str(&e.new_text);
                    prev.at = now;
                    trace!(target: "state.journal", row = e.row, "coalesce_insert");
                    self.redo.clear();
                    return;
                }
                EditKind::Delete
                    if e.col + e.old_text.chars().count() == prev.col =>
                {
                    prev.old_text = format!("{}{}", e.old_text, prev.old_text);
                    prev.col = e.col;
                    prev.at = now;
                    trace!(target: "state.journal", row = e.row, "coalesce_delete");
                    self.redo.clear();
                    return;
                }
                _ => {}
            }
        }
        e.at = now;
        self.undo.push(e);
        self.redo.clear();
        self.armed = true;
        trace!(target: "state.journal", undo_depth = self.undo.len(), "record_edit");
    }

    /// End the current coalescing run. Called on any cursor-only movement and
    /// after undo/redo.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn pop_undo(&mut self) -> Option<Edit> {
        self.armed = false;
        let e = self.undo.pop();
        if e.is_some() {
            trace!(target: "state.journal", undo_depth = self.undo.len(), "undo_pop");
        }
        e
    }

    pub fn pop_redo(&mut self) -> Option<Edit> {
        let e = self.redo.pop();
        if e.is_some() {
            trace!(target: "state.journal", redo_depth = self.redo.len(), "redo_pop");
        }
        e
    }

    /// Park an undone edit for redo.
    pub fn push_redo(&mut self, e: Edit) {
        self.redo.push(e);
    }

    /// Return a redone edit to the undo stack without clearing redo or
    /// re-arming coalescing.
    pub fn push_undo_applied(&mut self, e: Edit) {
        self.undo.push(e);
    }
}
