//! Editor state: documents, tabs, the undo journal, and viewport derivation.
//!
//! Ownership layering:
//! * [`Document`] exclusively owns its line store, cursor, selection, journal,
//!   scroll offsets, and navigation stacks.
//! * [`Session`] exclusively owns the documents ("tabs") and tracks the
//!   active one.
//! * [`EditorState`] is the composition root shared between the input/render
//!   loop and the command consumer. Both mutate it under a lock, one at a
//!   time; nothing here is internally synchronized.
//!
//! Undo model: a journal of reversible edit records with time-windowed
//! coalescing (see [`journal`]), not whole-buffer snapshots. An edit applies
//! synchronously within one event's handling, so no record is ever left
//! half-applied.

pub mod document;
pub mod journal;
pub mod session;
pub mod viewport;

pub use document::{Document, Hint, Selection};
pub use journal::{COALESCE_WINDOW, Edit, EditKind, Journal};
pub use session::Session;
pub use viewport::{Repaint, ViewDims};

use std::time::{Duration, Instant};

/// Transient status-bar message. Expiry is checked at render time; there is
/// no timer task.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Default time a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Top-level editor state container.
pub struct EditorState {
    pub session: Session,
    /// Whether the line-number gutter is drawn.
    pub line_number: bool,
    /// Internal clipboard for copy/cut/paste.
    pub clipboard: String,
    /// Workspace file names offered by the filename-open console.
    pub files: Vec<String>,
    pub status: Option<StatusMessage>,
    /// Last known editor text area (columns, rows), updated on resize.
    pub dims: ViewDims,
    /// Rows scrolled per wheel event.
    pub wheel_step: usize,
}

impl EditorState {
    pub fn new(doc: Document) -> Self {
        Self {
            session: Session::new(doc),
            line_number: true,
            clipboard: String::new(),
            files: Vec::new(),
            status: None,
            dims: ViewDims::default(),
            wheel_step: 3,
        }
    }

    /// Borrow the active document. The session must be non-empty; the caller
    /// observing the empty (terminal) state exits before touching documents.
    pub fn doc(&self) -> &Document {
        self.session.active()
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        self.session.active_mut()
    }

    /// Gutter width in screen cells: line-count digits plus one space of
    /// padding on each side, or 0 when the gutter is hidden.
    pub fn gutter_width(&self) -> usize {
        if !self.line_number || self.session.is_empty() {
            return 0;
        }
        let mut n = self.doc().store.len();
        let mut digits = 0usize;
        while n > 0 {
            n /= 10;
            digits += 1;
        }
        digits + 2
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: Instant::now() + STATUS_TTL,
        });
    }

    /// Current status text, dropping it once expired.
    pub fn status_text(&mut self) -> Option<String> {
        if let Some(m) = &self.status {
            if Instant::now() >= m.expires_at {
                self.status = None;
            } else {
                return Some(m.text.clone());
            }
        }
        None
    }
}
