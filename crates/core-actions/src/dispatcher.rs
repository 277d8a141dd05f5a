//! Input dispatch: global shortcuts, editor keys, console keys, and mouse.
//!
//! Layering: the dispatcher mutates documents through `core-state` primitives
//! and records every edit in the journal; blocking work (open/save/search)
//! is never performed here; it is submitted as a textual command for the
//! serial consumer. The console slot (`Option<Console>`) doubles as the focus
//! flag: `Some` means the console line owns keystrokes.
//!
//! Screen geometry mirrors the frame layout: row 0 is the tab bar, the next
//! `dims.height` rows are the editor, then the status row and console row.

use crate::io_ops;
use core_console::{Console, ConsoleMode, Dispatch};
use core_events::{
    CommandSender, InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use core_state::session::TAB_CLOSE_LABEL;
use core_state::{Document, Edit, EditorState, Repaint, Selection, ViewDims};
use core_text::width::{char_width, column_from_screen_width};
use core_text::leading_whitespace;
use std::time::{Duration, Instant};
use tracing::debug;

/// Two key events closer than this are treated as a terminal paste; Enter
/// then skips auto-indent so pasted text lands verbatim.
const PASTE_GAP: Duration = Duration::from_millis(10);

/// Screen row of the first editor line; row 0 is the tab bar.
const EDITOR_Y: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: false,
            quit: true,
        }
    }
}

/// Move the cursor of the active document, re-deriving scroll offsets from
/// the current dimensions and gutter width.
pub(crate) fn jump_to(state: &mut EditorState, row: usize, col: usize) -> Repaint {
    let dims = state.dims;
    let gutter = state.gutter_width();
    state.doc_mut().jump(row, col, dims, gutter)
}

#[derive(Default)]
pub struct Dispatcher {
    /// Timestamp of the previous editor keystroke, for paste detection.
    last_key_at: Option<Instant>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(
        &mut self,
        state: &mut EditorState,
        console: &mut Option<Console>,
        ev: InputEvent,
        commands: &CommandSender,
    ) -> DispatchResult {
        match ev {
            InputEvent::Resize(w, h) => {
                state.dims = ViewDims {
                    width: w as usize,
                    height: (h as usize).saturating_sub(3),
                };
                debug!(target: "runtime.input", w, h, "resize");
                DispatchResult::dirty()
            }
            InputEvent::Mouse(m) => self.handle_mouse(state, console, m),
            InputEvent::Key(k) => self.handle_key(state, console, k, commands),
        }
    }

    // ------------------------------------------------------------ key routing

    fn handle_key(
        &mut self,
        state: &mut EditorState,
        console: &mut Option<Console>,
        key: KeyEvent,
        commands: &CommandSender,
    ) -> DispatchResult {
        if let Some(res) = self.global_shortcut(state, console, key, commands) {
            return res;
        }
        if console.is_some() {
            self.console_key(state, console, key, commands)
        } else {
            let res = self.editor_key(state, console, key);
            if !matches!(key.code, KeyCode::Up | KeyCode::Down) {
                state.doc_mut().reset_ideal_column();
            }
            self.last_key_at = Some(Instant::now());
            res
        }
    }

    /// Shortcuts that work regardless of focus. Returns `None` when the key
    /// is not a global shortcut.
    fn global_shortcut(
        &mut self,
        state: &mut EditorState,
        console: &mut Option<Console>,
        key: KeyEvent,
        commands: &CommandSender,
    ) -> Option<DispatchResult> {
        if !key.mods.contains(KeyModifiers::CTRL) {
            return None;
        }
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        let res = match c {
            'q' => DispatchResult::quit(),
            'l' => DispatchResult::dirty(),
            'w' => {
                let i = state.session.active_index();
                state.session.close(i);
                if state.session.is_empty() {
                    return Some(DispatchResult::quit());
                }
                *console = None;
                DispatchResult::dirty()
            }
            't' => {
                state.session.push_tab(Document::empty());
                *console = None;
                DispatchResult::dirty()
            }
            'o' => {
                // Workspace file picker; only inside a git-rooted tree.
                let Some(files) = io_ops::workspace_files_here() else {
                    return Some(DispatchResult::none());
                };
                state.files = files;
                let mut con = Console::new();
                con.refilter(&state.doc().symbols, &state.files);
                *console = Some(con);
                DispatchResult::dirty()
            }
            'g' => {
                *console = Some(Console::with_text(":"));
                DispatchResult::dirty()
            }
            'r' => {
                *console = Some(Console::with_text("@"));
                DispatchResult::dirty()
            }
            'p' => {
                *console = Some(Console::with_text(">"));
                DispatchResult::dirty()
            }
            'f' => {
                // Seed the search with a single-line selection when present.
                let doc = state.doc();
                let seed = doc
                    .selected()
                    .filter(|s| s.start_row == s.end_row)
                    .map(|s| doc.selection_text(&s))
                    .unwrap_or_default();
                *console = Some(Console::with_text(&format!("#{seed}")));
                DispatchResult::dirty()
            }
            's' => {
                let name = state
                    .doc()
                    .file_name
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                if !commands.submit(format!(">save {name}")) {
                    state.set_status("command pending, try again");
                }
                DispatchResult::dirty()
            }
            _ => return None,
        };
        Some(res)
    }

    // ------------------------------------------------------------ console keys

    fn console_key(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
        key: KeyEvent,
        commands: &CommandSender,
    ) -> DispatchResult {
        let Some(console) = console_slot.as_mut() else {
            return DispatchResult::none();
        };
        match key.code {
            KeyCode::Esc => {
                // Drop the transient selection used for find highlighting.
                if console.mode() == ConsoleMode::Find {
                    state.doc_mut().clear_selection();
                }
                *console_slot = None;
                DispatchResult::dirty()
            }
            KeyCode::Enter => {
                match console.resolve_enter() {
                    Dispatch::Command(cmd) => {
                        if commands.submit(cmd) {
                            *console_slot = None;
                        } else {
                            state.set_status("command pending, try again");
                        }
                    }
                    Dispatch::Close => *console_slot = None,
                }
                DispatchResult::dirty()
            }
            KeyCode::Left => {
                console.move_left();
                DispatchResult::dirty()
            }
            KeyCode::Right => {
                console.move_right();
                DispatchResult::dirty()
            }
            KeyCode::Backspace => {
                console.backspace();
                console.refilter(&state.doc().symbols, &state.files);
                DispatchResult::dirty()
            }
            KeyCode::Tab => {
                console.cycle(true);
                DispatchResult::dirty()
            }
            KeyCode::BackTab => {
                console.cycle(false);
                DispatchResult::dirty()
            }
            KeyCode::Char('_') if key.mods.contains(KeyModifiers::CTRL) => {
                self.find_previous(state, console_slot)
            }
            KeyCode::Char(c) if !key.mods.contains(KeyModifiers::CTRL) => {
                console.insert(c);
                console.refilter(&state.doc().symbols, &state.files);
                DispatchResult::dirty()
            }
            _ => DispatchResult::none(),
        }
    }

    /// Ctrl-_ inside `#` mode: re-derive the previous match position from the
    /// back stack and re-highlight the keyword ending there.
    fn find_previous(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
    ) -> DispatchResult {
        let Some(console) = console_slot.as_ref() else {
            return DispatchResult::none();
        };
        if console.mode() != ConsoleMode::Find {
            return DispatchResult::none();
        }
        let keyword_len = console.remainder().chars().count();
        let Some(p) = state.doc_mut().pop_back() else {
            return DispatchResult::none();
        };
        jump_to(state, p.row, p.col);
        let doc = state.doc_mut();
        let (row, col) = (doc.row, doc.col);
        doc.set_selection(Selection {
            start_row: row,
            start_col: col.saturating_sub(keyword_len),
            end_row: row,
            end_col: col,
        });
        DispatchResult::dirty()
    }

    // ------------------------------------------------------------- editor keys

    fn editor_key(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
        key: KeyEvent,
    ) -> DispatchResult {
        if key.mods.contains(KeyModifiers::CTRL) {
            if let KeyCode::Char(c) = key.code {
                return self.editor_ctrl_key(state, console_slot, c);
            }
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(state, c),
            KeyCode::Enter => self.insert_newline(state),
            KeyCode::Backspace => self.backspace(state),
            KeyCode::Left => {
                let doc = state.doc_mut();
                doc.journal.disarm();
                if let Some(sel) = doc.selected() {
                    doc.clear_selection();
                    jump_to(state, sel.start_row, sel.start_col);
                    return DispatchResult::dirty();
                }
                if doc.row == 0 && doc.col == 0 {
                    return DispatchResult::none();
                }
                if doc.col == 0 {
                    let row = doc.row - 1;
                    jump_to(state, row, usize::MAX);
                } else {
                    let (row, col) = (doc.row, doc.col - 1);
                    jump_to(state, row, col);
                }
                DispatchResult::dirty()
            }
            KeyCode::Right => {
                let doc = state.doc_mut();
                doc.journal.disarm();
                if let Some(sel) = doc.selected() {
                    doc.clear_selection();
                    jump_to(state, sel.end_row, sel.end_col);
                    return DispatchResult::dirty();
                }
                if doc.col < doc.line_len(doc.row) {
                    let (row, col) = (doc.row, doc.col + 1);
                    jump_to(state, row, col);
                } else if doc.row == doc.store.last_row() {
                    return DispatchResult::none();
                } else {
                    let row = doc.row + 1;
                    jump_to(state, row, 0);
                }
                DispatchResult::dirty()
            }
            KeyCode::Up => self.vertical_move(state, true),
            KeyCode::Down => {
                if key.mods.contains(KeyModifiers::META) {
                    state.doc_mut().journal.disarm();
                    state.doc_mut().clear_selection();
                    jump_to(state, usize::MAX, usize::MAX);
                    return DispatchResult::dirty();
                }
                self.vertical_move(state, false)
            }
            KeyCode::Home => self.home(state),
            KeyCode::End => self.end(state),
            KeyCode::PageUp => {
                let doc = state.doc_mut();
                doc.clear_selection();
                let page = state.dims.height.saturating_sub(2);
                let (row, col) = (state.doc().row.saturating_sub(page), state.doc().col);
                jump_to(state, row, col);
                DispatchResult::dirty()
            }
            KeyCode::PageDown => {
                state.doc_mut().clear_selection();
                let page = state.dims.height.saturating_sub(2);
                let doc = state.doc();
                let row = (doc.row + page).min(doc.store.last_row());
                let col = doc.col;
                jump_to(state, row, col);
                DispatchResult::dirty()
            }
            KeyCode::Tab => self.indent_or_accept_hint(state),
            KeyCode::BackTab => self.unindent(state),
            KeyCode::Esc => {
                let doc = state.doc_mut();
                doc.clear_selection();
                doc.clear_hint();
                DispatchResult::dirty()
            }
            _ => DispatchResult::none(),
        }
    }

    fn editor_ctrl_key(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
        c: char,
    ) -> DispatchResult {
        match c {
            'u' => {
                // Delete to line start.
                let doc = state.doc_mut();
                let (row, col) = (doc.row, doc.col);
                if col == 0 {
                    return DispatchResult::none();
                }
                let removed = doc.delete_range(row, 0, row, col);
                doc.record(Edit::delete(row, 0, removed));
                jump_to(state, row, 0);
                DispatchResult::dirty()
            }
            'z' => {
                if state.doc_mut().undo() {
                    let (row, col) = (state.doc().row, state.doc().col);
                    jump_to(state, row, col);
                }
                DispatchResult::dirty()
            }
            'y' => {
                if state.doc_mut().redo() {
                    let (row, col) = (state.doc().row, state.doc().col);
                    jump_to(state, row, col);
                }
                DispatchResult::dirty()
            }
            'c' => {
                let doc = state.doc();
                let text = match doc.selected() {
                    Some(sel) => doc.selection_text(&sel),
                    None => doc
                        .line(doc.row)
                        .map(|l| l.iter().collect::<String>())
                        .unwrap_or_default(),
                };
                if text.is_empty() {
                    return DispatchResult::none();
                }
                state.clipboard = text;
                DispatchResult::none()
            }
            'x' => self.cut(state),
            'v' => self.paste(state),
            '_' => {
                if let Some(p) = state.doc_mut().pop_back() {
                    jump_to(state, p.row, p.col);
                }
                DispatchResult::dirty()
            }
            'a' => self.home(state),
            'e' => self.end(state),
            'b' => self.symbol_under_cursor(state, console_slot),
            _ => DispatchResult::none(),
        }
    }

    fn insert_char(&mut self, state: &mut EditorState, c: char) -> DispatchResult {
        let doc = state.doc_mut();
        if let Some(sel) = doc.selected() {
            let deleted = doc.delete_range(sel.start_row, sel.start_col, sel.end_row, sel.end_col);
            doc.clear_selection();
            let (row, col) = (doc.row, doc.col);
            doc.insert_text(&c.to_string(), row, col);
            doc.record(Edit::replace(
                sel.start_row,
                sel.start_col,
                deleted,
                c.to_string(),
            ));
        } else {
            let (row, col) = (doc.row, doc.col);
            doc.insert_text(&c.to_string(), row, col);
            doc.record(Edit::insert(row, col, c.to_string()));
        }
        let (row, col) = (state.doc().row, state.doc().col);
        jump_to(state, row, col);
        state.doc_mut().refresh_hint();
        DispatchResult::dirty()
    }

    fn insert_newline(&mut self, state: &mut EditorState) -> DispatchResult {
        let paste = self
            .last_key_at
            .map(|t| t.elapsed() < PASTE_GAP)
            .unwrap_or(false);
        let doc = state.doc_mut();
        let (row, col) = (doc.row, doc.col.min(doc.line_len(doc.row)));
        let line = doc.line(row).cloned().unwrap_or_default();

        if col == 0 || paste {
            doc.store.split(row, col);
            doc.record(Edit::insert(row, col, "\n"));
            jump_to(state, row + 1, col);
            return DispatchResult::dirty();
        }

        // Auto-indent: carry the leading-whitespace depth as tabs.
        let n = leading_whitespace(&line[..col]);
        if line[col - 1] == '{' && col < line.len() && line[col] == '}' {
            // Open an indented block and put the closer on its own line.
            doc.store.split(row, col);
            doc.store.insert_after(row, vec!['\t'; n + 1]);
            if let Some(closer) = doc.store.get_mut(row + 2) {
                for _ in 0..n {
                    closer.insert(0, '\t');
                }
            }
            let inserted = format!("\n{}\n{}", "\t".repeat(n + 1), "\t".repeat(n));
            doc.record(Edit::insert(row, col, inserted));
            jump_to(state, row + 1, n + 1);
        } else {
            doc.store.split(row, col);
            if let Some(next) = doc.store.get_mut(row + 1) {
                for _ in 0..n {
                    next.insert(0, '\t');
                }
            }
            doc.record(Edit::insert(row, col, format!("\n{}", "\t".repeat(n))));
            jump_to(state, row + 1, n);
        }
        DispatchResult::dirty()
    }

    fn backspace(&mut self, state: &mut EditorState) -> DispatchResult {
        let doc = state.doc_mut();
        if let Some(sel) = doc.selected() {
            let deleted = doc.delete_range(sel.start_row, sel.start_col, sel.end_row, sel.end_col);
            doc.clear_selection();
            doc.record(Edit::delete(sel.start_row, sel.start_col, deleted));
            let (row, col) = (doc.row, doc.col);
            jump_to(state, row, col);
            state.doc_mut().refresh_hint();
            return DispatchResult::dirty();
        }
        let (row, col) = (doc.row, doc.col);
        if col == 0 {
            if row == 0 {
                return DispatchResult::none();
            }
            // Join with the previous line.
            let prev_len = doc.line_len(row - 1);
            doc.store.merge_with_next(row - 1);
            doc.record(Edit::delete(row - 1, prev_len, "\n"));
            jump_to(state, row - 1, prev_len);
            return DispatchResult::dirty();
        }
        let deleted = doc.delete_range(row, col - 1, row, col);
        doc.record(Edit::delete(row, col - 1, deleted));
        jump_to(state, row, col - 1);
        state.doc_mut().refresh_hint();
        DispatchResult::dirty()
    }

    fn vertical_move(&mut self, state: &mut EditorState, up: bool) -> DispatchResult {
        let doc = state.doc_mut();
        doc.journal.disarm();
        doc.clear_selection();
        if up && doc.row == 0 {
            return DispatchResult::none();
        }
        if !up && doc.row == doc.store.last_row() {
            return DispatchResult::none();
        }
        let width = doc.ideal_column();
        let target = if up { doc.row - 1 } else { doc.row + 1 };
        let col = doc
            .line(target)
            .map(|line| column_from_screen_width(line, width))
            .unwrap_or(0);
        jump_to(state, target, col);
        DispatchResult::dirty()
    }

    fn home(&mut self, state: &mut EditorState) -> DispatchResult {
        let doc = state.doc_mut();
        doc.journal.disarm();
        doc.clear_selection();
        let row = doc.row;
        let col = doc.line(row).map(|l| leading_whitespace(l)).unwrap_or(0);
        jump_to(state, row, col);
        DispatchResult::dirty()
    }

    fn end(&mut self, state: &mut EditorState) -> DispatchResult {
        let doc = state.doc_mut();
        doc.journal.disarm();
        doc.clear_selection();
        let row = doc.row;
        jump_to(state, row, usize::MAX);
        DispatchResult::dirty()
    }

    fn cut(&mut self, state: &mut EditorState) -> DispatchResult {
        let doc = state.doc_mut();
        let deleted = if let Some(sel) = doc.selected() {
            let deleted = doc.delete_range(sel.start_row, sel.start_col, sel.end_row, sel.end_col);
            doc.clear_selection();
            doc.record(Edit::delete(sel.start_row, sel.start_col, deleted.clone()));
            deleted
        } else {
            let (row, len) = (doc.row, doc.line_len(doc.row));
            if len == 0 {
                return DispatchResult::none();
            }
            let deleted = doc.delete_range(row, 0, row, len);
            doc.record(Edit::delete(row, 0, deleted.clone()));
            deleted
        };
        state.clipboard = deleted;
        let (row, col) = (state.doc().row, state.doc().col);
        jump_to(state, row, col);
        DispatchResult::dirty()
    }

    fn paste(&mut self, state: &mut EditorState) -> DispatchResult {
        if state.clipboard.is_empty() {
            return DispatchResult::none();
        }
        let clip = state.clipboard.clone();
        let doc = state.doc_mut();
        if let Some(sel) = doc.selected() {
            let deleted = doc.delete_range(sel.start_row, sel.start_col, sel.end_row, sel.end_col);
            doc.clear_selection();
            doc.insert_text(&clip, sel.start_row, sel.start_col);
            doc.record(Edit::replace(sel.start_row, sel.start_col, deleted, clip));
        } else {
            let (row, col) = (doc.row, doc.col);
            doc.insert_text(&clip, row, col);
            doc.record(Edit::insert(row, col, clip));
        }
        let (row, col) = (state.doc().row, state.doc().col);
        jump_to(state, row, col);
        DispatchResult::dirty()
    }

    fn indent_or_accept_hint(&mut self, state: &mut EditorState) -> DispatchResult {
        let doc = state.doc_mut();
        if let Some(sel) = doc.selected() {
            // Indent every selected row, keeping the selection aligned.
            if let Some(raw) = doc.selection_raw() {
                doc.set_selection(Selection {
                    start_row: raw.start_row,
                    start_col: raw.start_col + 1,
                    end_row: raw.end_row,
                    end_col: raw.end_col + 1,
                });
            }
            let last = doc.store.last_row();
            for row in sel.start_row..=sel.end_row.min(last) {
                if let Some(line) = doc.store.get_mut(row) {
                    line.insert(0, '\t');
                }
                doc.record(Edit::insert(row, 0, "\t"));
                if row == doc.row {
                    doc.col += 1;
                }
            }
            return DispatchResult::dirty();
        }
        if let Some(hint) = doc.hint.clone() {
            // Accept the inline completion: replace the typed prefix.
            let (row, col) = (doc.row, doc.col);
            let start = col.saturating_sub(hint.off);
            let deleted = doc.delete_range(row, start, row, col);
            doc.insert_text(&hint.text, row, start);
            doc.record(Edit::replace(row, start, deleted, hint.text.clone()));
            doc.clear_hint();
            let (row, col) = (doc.row, doc.col);
            jump_to(state, row, col);
            return DispatchResult::dirty();
        }
        let (row, col) = (doc.row, doc.col);
        doc.insert_text("\t", row, col);
        doc.record(Edit::insert(row, col, "\t"));
        jump_to(state, row, col + 1);
        DispatchResult::dirty()
    }

    fn unindent(&mut self, state: &mut EditorState) -> DispatchResult {
        fn unindent_row(doc: &mut Document, row: usize) {
            let starts_with_tab = doc
                .line(row)
                .map(|l| l.first() == Some(&'\t'))
                .unwrap_or(false);
            if !starts_with_tab {
                return;
            }
            if let Some(line) = doc.store.get_mut(row) {
                line.remove(0);
            }
            doc.record(Edit::delete(row, 0, "\t"));
            if row == doc.row {
                doc.col = doc.col.saturating_sub(1);
            }
        }
        let doc = state.doc_mut();
        if let Some(sel) = doc.selected() {
            if let Some(raw) = doc.selection_raw() {
                doc.set_selection(Selection {
                    start_row: raw.start_row,
                    start_col: raw.start_col.saturating_sub(1),
                    end_row: raw.end_row,
                    end_col: raw.end_col.saturating_sub(1),
                });
            }
            let last = doc.store.last_row();
            for row in sel.start_row..=sel.end_row.min(last) {
                unindent_row(doc, row);
            }
        } else {
            let row = doc.row;
            unindent_row(doc, row);
        }
        DispatchResult::dirty()
    }

    /// Ctrl-B: resolve the identifier at the cursor through the symbol index.
    /// A unique hit jumps directly; multiple hits open the `@` console with
    /// the candidates.
    fn symbol_under_cursor(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
    ) -> DispatchResult {
        let Some(word) = state.doc().word_at_cursor() else {
            return DispatchResult::none();
        };
        let hits: Vec<(usize, usize, String)> = state
            .doc()
            .symbols
            .lookup(&word)
            .iter()
            .map(|s| (s.line, s.column, s.qualified_name()))
            .collect();
        match hits.len() {
            0 => DispatchResult::none(),
            1 => {
                let (line, column, _) = hits[0].clone();
                state.doc_mut().record_position();
                jump_to(state, line.saturating_sub(1), column.saturating_sub(1));
                DispatchResult::dirty()
            }
            _ => {
                let mut options: Vec<String> = hits.into_iter().map(|(_, _, q)| q).collect();
                options.sort();
                let mut con = Console::with_text(&format!("@{word}"));
                con.set_candidates(options, Some(0));
                *console_slot = Some(con);
                DispatchResult::dirty()
            }
        }
    }

    // ------------------------------------------------------------------- mouse

    fn handle_mouse(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
        m: MouseEvent,
    ) -> DispatchResult {
        let height = state.dims.height;
        let status_y = EDITOR_Y + height;
        let console_y = status_y + 1;
        let (x, y) = (m.column as usize, m.row as usize);
        match m.kind {
            MouseEventKind::ScrollUp => {
                let step = state.wheel_step as isize;
                state.doc_mut().scroll_viewport(-step, height);
                DispatchResult::dirty()
            }
            MouseEventKind::ScrollDown => {
                let step = state.wheel_step as isize;
                state.doc_mut().scroll_viewport(step, height);
                DispatchResult::dirty()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if y == 0 {
                    return self.tabbar_click(state, console_slot, x);
                }
                if y == console_y {
                    let con = console_slot.get_or_insert_with(Console::new);
                    let col = column_from_screen_width(con.chars(), x);
                    con.set_cursor(col);
                    return DispatchResult::dirty();
                }
                if y >= EDITOR_Y && y < status_y {
                    return self.editor_click(state, console_slot, x, y - EDITOR_Y, false);
                }
                DispatchResult::none()
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if y >= EDITOR_Y && y < status_y {
                    return self.editor_click(state, console_slot, x, y - EDITOR_Y, true);
                }
                DispatchResult::none()
            }
            MouseEventKind::Up(_) => {
                let doc = state.doc_mut();
                if doc.selecting {
                    doc.selecting = false;
                    if doc.selection_raw().map(|s| s.is_empty()).unwrap_or(false) {
                        doc.clear_selection();
                    }
                }
                DispatchResult::none()
            }
            _ => DispatchResult::none(),
        }
    }

    fn editor_click(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
        x: usize,
        rel_row: usize,
        drag: bool,
    ) -> DispatchResult {
        *console_slot = None;
        let gutter = state.gutter_width();
        let doc = state.doc_mut();
        let row = (rel_row + doc.top).min(doc.store.last_row());
        let screen_col = (x + doc.left).saturating_sub(gutter);
        let col = doc
            .line(row)
            .map(|line| column_from_screen_width(line, screen_col))
            .unwrap_or(0);
        if drag && doc.selecting {
            doc.extend_selection(row, col);
        } else if !drag {
            doc.set_selection(Selection::caret(row, col));
            doc.selecting = true;
            doc.record_position();
        }
        jump_to(state, row, col);
        state.doc_mut().reset_ideal_column();
        DispatchResult::dirty()
    }

    fn tabbar_click(
        &mut self,
        state: &mut EditorState,
        console_slot: &mut Option<Console>,
        x: usize,
    ) -> DispatchResult {
        let mut start = 0usize;
        for i in 0..state.session.len() {
            let name = state.session.tabs()[i].display_name();
            // A separator after the name belongs to the name span.
            let name_w: usize = name.chars().map(char_width).sum::<usize>() + 1;
            let closer_end = start + name_w + TAB_CLOSE_LABEL.len();
            if x < start + name_w {
                if i != state.session.active_index() {
                    state.session.switch(i);
                }
                *console_slot = None;
                return DispatchResult::dirty();
            }
            if x < closer_end {
                state.session.close(i);
                if state.session.is_empty() {
                    return DispatchResult::quit();
                }
                *console_slot = None;
                return DispatchResult::dirty();
            }
            // Separator after the closer belongs to the next tab.
            start = closer_end + 1;
        }
        DispatchResult::none()
    }
}
