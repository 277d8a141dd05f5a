//! One editable buffer: line store + cursor + selection + journal + viewport
//! offsets + navigation history.
//!
//! Selection endpoints are stored in drag order; normalization happens when
//! the selection is *read* ([`Document::selected`]), never when written, so
//! Left/Right can collapse to the drag start/end respectively.
//!
//! `delete_range` and `insert_text` honor a round-trip contract: inserting
//! the text returned by a deletion at the deletion start reproduces the
//! original content exactly, including multi-line spans.

use crate::journal::{Edit, EditKind, Journal};
use crate::viewport::{Repaint, ViewDims, horizontal_scroll, vertical_scroll};
use core_symbol::SymbolIndex;
use core_text::width::column_to_screen_width;
use core_text::{Line, LineStore, Position, line_to_string};
use std::path::PathBuf;

/// Selection endpoints in drag order. Equal endpoints mean "no selection".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Selection {
    /// Degenerate selection used as the anchor when a mouse drag begins.
    pub fn caret(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// Copy with start <= end lexicographically on (row, col).
    pub fn normalized(&self) -> Self {
        let a = Position::new(self.start_row, self.start_col);
        let b = Position::new(self.end_row, self.end_col);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start_row: lo.row,
            start_col: lo.col,
            end_row: hi.row,
            end_col: hi.col,
        }
    }

    pub fn contains_row(&self, row: usize) -> bool {
        let n = self.normalized();
        n.start_row <= row && row <= n.end_row
    }
}

/// Inline completion hint shown dimmed after the cursor at end of line.
/// `text` is the full symbol name, `off` the number of codepoints the user
/// has already typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub text: String,
    pub off: usize,
}

impl Hint {
    /// The not-yet-typed remainder to display.
    pub fn pending(&self) -> String {
        self.text.chars().skip(self.off).collect()
    }
}

/// One editable buffer ("tab").
pub struct Document {
    pub store: LineStore,
    /// Cursor row in `[0, store.len())`.
    pub row: usize,
    /// Cursor column in `[0, line_len(row)]`, codepoints.
    pub col: usize,
    /// First visible row.
    pub top: usize,
    /// First visible screen column.
    pub left: usize,
    /// Screen column preserved while moving vertically; cleared by any
    /// non-vertical action.
    ideal_col: Option<usize>,
    /// Backing file; `None` for an unsaved buffer.
    pub file_name: Option<PathBuf>,
    selection: Option<Selection>,
    /// True while a mouse drag is extending the selection.
    pub selecting: bool,
    pub journal: Journal,
    /// Snapshot of the symbol table for this buffer.
    pub symbols: SymbolIndex,
    back_stack: Vec<Position>,
    forward_stack: Vec<Position>,
    pub hint: Option<Hint>,
}

impl Document {
    pub fn empty() -> Self {
        Self::with_store(LineStore::new(), None)
    }

    /// Buffer named after `name` holding `text` with file-load semantics
    /// (guaranteed trailing empty line).
    pub fn from_text(name: &str, text: &str) -> Self {
        Self::with_store(LineStore::from_source(text), Some(PathBuf::from(name)))
    }

    pub fn with_store(store: LineStore, file_name: Option<PathBuf>) -> Self {
        Self {
            store,
            row: 0,
            col: 0,
            top: 0,
            left: 0,
            ideal_col: None,
            file_name,
            selection: None,
            selecting: false,
            journal: Journal::new(),
            symbols: SymbolIndex::new(),
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
            hint: None,
        }
    }

    /// Tab label: file stem or "untitled".
    pub fn display_name(&self) -> String {
        self.file_name
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string()
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.store.get(row)
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.store.line_len(row)
    }

    // ---------------------------------------------------------------- selection

    /// Normalized copy of the active selection, or `None` when absent or
    /// degenerate. Storage keeps drag order.
    pub fn selected(&self) -> Option<Selection> {
        self.selection
            .filter(|s| !s.is_empty())
            .map(|s| s.normalized())
    }

    /// Raw selection including degenerate anchors (drag in progress).
    pub fn selection_raw(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, sel: Selection) {
        self.selection = Some(sel);
    }

    /// Extend the drag end point.
    pub fn extend_selection(&mut self, row: usize, col: usize) {
        if let Some(sel) = &mut self.selection {
            sel.end_row = row;
            sel.end_col = col;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.selecting = false;
    }

    /// Text covered by the normalized selection, lines joined with `'\n'`.
    pub fn selection_text(&self, sel: &Selection) -> String {
        let sel = sel.normalized();
        if sel.start_row == sel.end_row {
            let line = self.store.get(sel.start_row).map(Vec::as_slice).unwrap_or(&[]);
            let end = sel.end_col.min(line.len());
            let start = sel.start_col.min(end);
            return line[start..end].iter().collect();
        }
        let mut out = String::new();
        for row in sel.start_row..=sel.end_row.min(self.store.last_row()) {
            let line = self.store.get(row).map(Vec::as_slice).unwrap_or(&[]);
            if row == sel.start_row {
                out.extend(line[sel.start_col.min(line.len())..].iter());
                out.push('\n');
            } else if row == sel.end_row {
                out.extend(line[..sel.end_col.min(line.len())].iter());
            } else {
                out.extend(line.iter());
                out.push('\n');
            }
        }
        out
    }

    // ------------------------------------------------------------------ editing

    /// Remove `[start, end)` and return the removed text with `'\n'` marking
    /// line boundaries. The cursor moves to the range start. The returned
    /// text re-inserted at the same position reproduces the original content.
    pub fn delete_range(
        &mut self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> String {
        let start_row = start_row.min(self.store.last_row());
        let end_row = end_row.min(self.store.last_row());
        let start_col = start_col.min(self.store.line_len(start_row));

        if start_row == end_row {
            let Some(line) = self.store.get_mut(start_row) else {
                return String::new();
            };
            let end_col = end_col.min(line.len());
            let start_col = start_col.min(end_col);
            let removed: String = line.drain(start_col..end_col).collect();
            self.row = start_row;
            self.col = start_col;
            return removed;
        }

        let mut removed = String::new();
        let tail: String = match self.store.get_mut(start_row) {
            Some(line) => line.drain(start_col..).collect(),
            None => String::new(),
        };
        removed.push_str(&tail);
        removed.push('\n');
        for _ in 0..end_row.saturating_sub(start_row + 1) {
            if let Some(mid) = self.store.remove(start_row + 1) {
                removed.push_str(&line_to_string(&mid));
                removed.push('\n');
            }
        }
        if let Some(end_line) = self.store.get_mut(start_row + 1) {
            let end_col = end_col.min(end_line.len());
            let head: String = end_line.drain(..end_col).collect();
            removed.push_str(&head);
        }
        self.store.merge_with_next(start_row);
        self.row = start_row;
        self.col = start_col;
        removed
    }

    /// Insert possibly multi-line text at (row, col), splitting lines as
    /// needed. The cursor ends just after the inserted text.
    pub fn insert_text(&mut self, text: &str, row: usize, col: usize) {
        if text.is_empty() {
            return;
        }
        let mut row = row.min(self.store.last_row());
        let mut col = col.min(self.store.line_len(row));
        for c in text.chars() {
            if c == '\n' {
                self.store.split(row, col);
                row += 1;
                col = 0;
            } else if let Some(line) = self.store.get_mut(row) {
                line.insert(col, c);
                col += 1;
            }
        }
        self.row = row;
        self.col = col;
    }

    /// Record a reversible edit in the journal.
    pub fn record(&mut self, e: Edit) {
        self.journal.record(e);
    }

    /// Undo the most recent journal entry. No-op (returns false) when the
    /// undo stack is empty.
    pub fn undo(&mut self) -> bool {
        let Some(e) = self.journal.pop_undo() else {
            return false;
        };
        self.apply_edit(&e.reversed());
        self.journal.push_redo(e);
        true
    }

    /// Re-apply the most recently undone entry. No-op on an empty redo stack.
    pub fn redo(&mut self) -> bool {
        let Some(e) = self.journal.pop_redo() else {
            return false;
        };
        self.apply_edit(&e);
        self.journal.push_undo_applied(e);
        true
    }

    fn apply_edit(&mut self, e: &Edit) {
        match e.kind {
            EditKind::Insert => self.insert_text(&e.new_text, e.row, e.col),
            EditKind::Delete => self.delete_recorded(e.row, e.col, &e.old_text),
            EditKind::Replace => {
                self.delete_recorded(e.row, e.col, &e.old_text);
                self.insert_text(&e.new_text, e.row, e.col);
            }
        }
    }

    /// Delete the span that `text` occupies starting at (row, col).
    fn delete_recorded(&mut self, row: usize, col: usize, text: &str) {
        let newlines = text.matches('\n').count();
        if newlines == 0 {
            self.delete_range(row, col, row, col + text.chars().count());
        } else {
            let last_len = text
                .rsplit('\n')
                .next()
                .map(|s| s.chars().count())
                .unwrap_or(0);
            self.delete_range(row, col, row + newlines, last_len);
        }
    }

    // ----------------------------------------------------------- ideal column

    /// Screen column to aim for during a vertical-movement sequence. Captured
    /// on first use and reused until reset.
    pub fn ideal_column(&mut self) -> usize {
        if let Some(w) = self.ideal_col {
            return w;
        }
        let line = self.store.get(self.row).map(Vec::as_slice).unwrap_or(&[]);
        let w = column_to_screen_width(line, self.col);
        self.ideal_col = Some(w);
        w
    }

    /// Any non-vertical action ends the vertical-movement sequence.
    pub fn reset_ideal_column(&mut self) {
        self.ideal_col = None;
    }

    // ------------------------------------------------------------- navigation

    /// Push the current position onto the back stack. Not folded into `jump`
    /// because not every jump is worth going back to.
    pub fn record_position(&mut self) {
        self.back_stack.push(Position::new(self.row, self.col));
        self.forward_stack.clear();
    }

    /// Pop the back stack, parking the current position for `pop_forward`.
    pub fn pop_back(&mut self) -> Option<Position> {
        let p = self.back_stack.pop()?;
        self.forward_stack.push(Position::new(self.row, self.col));
        Some(p)
    }

    pub fn pop_forward(&mut self) -> Option<Position> {
        let p = self.forward_stack.pop()?;
        self.back_stack.push(Position::new(self.row, self.col));
        Some(p)
    }

    // ---------------------------------------------------------------- viewport

    /// Move the cursor to (row, col), clamping out-of-range values to the
    /// last row / end of line, and re-derive scroll offsets. Returns what the
    /// renderer must repaint. Clears any pending hint.
    pub fn jump(&mut self, row: usize, col: usize, dims: ViewDims, gutter: usize) -> Repaint {
        let row = row.min(self.store.last_row());
        let col = col.min(self.store.line_len(row));
        let old_row = self.row;
        self.row = row;
        self.col = col;

        let mut scrolled = false;
        if dims.height > 0 {
            let new_top = vertical_scroll(self.top, row, self.store.len(), dims.height);
            if new_top != self.top {
                self.top = new_top;
                scrolled = true;
            }
        }
        let line = self.store.get(row).map(Vec::as_slice).unwrap_or(&[]);
        let screen_col = column_to_screen_width(line, col);
        let avail = dims.width.saturating_sub(gutter + 1);
        let new_left = horizontal_scroll(self.left, screen_col, avail);
        if new_left != self.left {
            self.left = new_left;
            scrolled = true;
        }

        self.hint = None;
        if scrolled {
            Repaint::Full
        } else {
            Repaint::Lines {
                old_row,
                new_row: row,
            }
        }
    }

    /// Wheel scrolling: move `top` by `delta` rows, clamped so the viewport
    /// never runs past the document. The cursor does not move.
    pub fn scroll_viewport(&mut self, delta: isize, height: usize) {
        let max_top = self.store.len().saturating_sub(height);
        let new_top = self.top as isize + delta;
        self.top = new_top.clamp(0, max_top as isize) as usize;
    }

    // -------------------------------------------------------------------- hint

    /// Recompute the inline symbol hint. Shown only when the cursor rests at
    /// end of line after an identifier of at least two codepoints.
    pub fn refresh_hint(&mut self) {
        self.hint = None;
        if self.symbols.is_empty() {
            return;
        }
        let Some(line) = self.store.get(self.row) else {
            return;
        };
        if self.col != line.len() {
            return;
        }
        let start = line[..self.col]
            .iter()
            .rposition(|&c| !is_ident_char(c))
            .map(|i| i + 1)
            .unwrap_or(0);
        let word: String = line[start..self.col].iter().collect();
        if let Some(name) = self.symbols.prefix_match(&word) {
            self.hint = Some(Hint {
                text: name.to_string(),
                off: word.chars().count(),
            });
        }
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }

    /// Identifier under the cursor, for symbol jump. Scans letters, digits
    /// and underscores around the cursor column.
    pub fn word_at_cursor(&self) -> Option<String> {
        let line = self.store.get(self.row)?;
        let mut start = self.row_col_floor(line);
        while start > 0 && is_ident_char(line[start - 1]) {
            start -= 1;
        }
        let mut stop = self.col.min(line.len());
        while stop < line.len() && is_ident_char(line[stop]) {
            stop += 1;
        }
        let word: String = line[start..stop].iter().collect();
        if word.is_empty() { None } else { Some(word) }
    }

    fn row_col_floor(&self, line: &Line) -> usize {
        self.col.min(line.len())
    }
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
