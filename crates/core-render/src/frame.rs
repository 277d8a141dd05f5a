//! Frame painter: composes the tab bar, visible document lines, status row,
//! console row, and the cursor from editor state.
//!
//! The painter repaints the frame it is asked for and keeps no damage state;
//! scroll bookkeeping already lives in the document, so the hot path here is
//! a straight walk over the visible rows.

use crate::{Cell, EDITOR_Y, Layout, Style, Surface};
use core_console::Console;
use core_state::session::TAB_CLOSE_LABEL;
use core_state::{Document, EditorState};
use core_text::width::{char_width, column_to_screen_width, expand_tabs};

/// Paint one full frame and place the cursor.
pub fn draw_frame(surface: &mut dyn Surface, state: &mut EditorState, console: Option<&Console>) {
    let (w, h) = surface.size();
    let layout = Layout::new(w, h);

    draw_tab_bar(surface, state, &layout);
    for i in 0..layout.editor_height {
        draw_editor_row(surface, state, &layout, i);
    }
    draw_status(surface, state, console, &layout);
    draw_console(surface, console, &layout);
    sync_cursor(surface, state, console, &layout);
}

fn pad(cells: &mut Vec<Cell>, width: usize, style: Style) {
    let mut used = 0usize;
    for c in cells.iter() {
        used += char_width(c.ch);
    }
    while used < width {
        cells.push(Cell::new(' ', style));
        used += 1;
    }
}

fn push_str(cells: &mut Vec<Cell>, s: &str, style: Style) {
    cells.extend(s.chars().map(|c| Cell::new(c, style)));
}

fn draw_tab_bar(surface: &mut dyn Surface, state: &EditorState, layout: &Layout) {
    let mut cells = Vec::with_capacity(layout.width);
    for (i, tab) in state.session.tabs().iter().enumerate() {
        let style = if i == state.session.active_index() {
            Style::Highlight
        } else {
            Style::Bar
        };
        push_str(&mut cells, &tab.display_name(), style);
        cells.push(Cell::new(' ', Style::Bar));
        push_str(&mut cells, TAB_CLOSE_LABEL, Style::Bar);
        cells.push(Cell::new(' ', Style::Bar));
    }
    pad(&mut cells, layout.width, Style::Bar);
    cells.truncate_to_width(layout.width);
    surface.draw_cells(0, 0, &cells);
}

/// Gutter text for one row: right-aligned 1-based number, one space either
/// side.
fn gutter_cells(state: &EditorState, row: usize, is_cursor_row: bool) -> Vec<Cell> {
    let width = state.gutter_width();
    if width == 0 {
        return Vec::new();
    }
    let number = format!("{:>width$} ", row + 1, width = width - 1);
    let style = if is_cursor_row {
        Style::ActiveGutter
    } else {
        Style::Dim
    };
    number.chars().map(|c| Cell::new(c, style)).collect()
}

fn draw_editor_row(surface: &mut dyn Surface, state: &EditorState, layout: &Layout, i: usize) {
    let doc = state.doc();
    let row = doc.top + i;
    let y = (EDITOR_Y + i) as u16;
    let mut cells: Vec<Cell> = Vec::with_capacity(layout.width);

    let Some(line) = doc.line(row) else {
        // Past the end of the document: clear the row.
        pad(&mut cells, layout.width, Style::Text);
        surface.draw_cells(0, y, &cells);
        return;
    };

    cells.extend(gutter_cells(state, row, row == doc.row));

    let selection = doc.selected();
    let sel_span = selection.and_then(|sel| {
        if !sel.contains_row(row) {
            return None;
        }
        let start = if sel.start_row == row {
            column_to_screen_width(line, sel.start_col)
        } else {
            0
        };
        let end = if sel.end_row == row {
            column_to_screen_width(line, sel.end_col)
        } else {
            usize::MAX
        };
        Some((start, end))
    });

    if line.is_empty() {
        if sel_span.is_some() {
            // Make the selection visible on an empty line.
            cells.push(Cell::new(' ', Style::Selection));
        }
    } else {
        let expanded = expand_tabs(line);
        let mut screen_col = 0usize;
        for &c in &expanded {
            let cw = char_width(c);
            if screen_col + cw > doc.left {
                let style = match sel_span {
                    Some((s, e)) if s <= screen_col && screen_col < e => Style::Selection,
                    _ => Style::Text,
                };
                cells.push(Cell::new(c, style));
            }
            screen_col += cw;
        }
    }

    if row == doc.row
        && let Some(hint) = &doc.hint
    {
        push_str(&mut cells, &hint.pending(), Style::Dim);
    }

    pad(&mut cells, layout.width, Style::Text);
    cells.truncate_to_width(layout.width);
    surface.draw_cells(0, y, &cells);
}

fn draw_status(
    surface: &mut dyn Surface,
    state: &mut EditorState,
    console: Option<&Console>,
    layout: &Layout,
) {
    let mut cells = Vec::with_capacity(layout.width);
    if let Some(con) = console.filter(|c| !c.candidates().is_empty()) {
        for (i, cand) in con.candidates().iter().enumerate() {
            let style = if Some(i) == con.selected() {
                Style::Highlight
            } else {
                Style::Bar
            };
            push_str(&mut cells, cand, style);
            cells.push(Cell::new(' ', Style::Bar));
        }
    } else if let Some(text) = state.status_text() {
        push_str(&mut cells, &text, Style::Bar);
    } else if console.is_none() && !state.session.is_empty() {
        let doc = state.doc();
        let screen_col = doc
            .line(doc.row)
            .map(|l| column_to_screen_width(l, doc.col))
            .unwrap_or(0);
        let text = format!("Line {}, Column {} ", doc.row + 1, screen_col + 1);
        push_str(&mut cells, &text, Style::Bar);
    }
    pad(&mut cells, layout.width, Style::Bar);
    cells.truncate_to_width(layout.width);
    surface.draw_cells(0, layout.status_y as u16, &cells);
}

fn draw_console(surface: &mut dyn Surface, console: Option<&Console>, layout: &Layout) {
    let mut cells = Vec::with_capacity(layout.width);
    if let Some(con) = console {
        cells.extend(con.chars().iter().map(|&c| Cell::new(c, Style::Text)));
    }
    pad(&mut cells, layout.width, Style::Text);
    cells.truncate_to_width(layout.width);
    surface.draw_cells(0, layout.console_y as u16, &cells);
}

fn sync_cursor(
    surface: &mut dyn Surface,
    state: &EditorState,
    console: Option<&Console>,
    layout: &Layout,
) {
    if let Some(con) = console {
        let x = column_to_screen_width(con.chars(), con.cursor());
        surface.set_cursor(x as u16, layout.console_y as u16);
        return;
    }
    if state.session.is_empty() {
        surface.hide_cursor();
        return;
    }
    let doc: &Document = state.doc();
    if doc.row < doc.top || doc.row >= doc.top + layout.editor_height {
        surface.hide_cursor();
        return;
    }
    let screen_col = doc
        .line(doc.row)
        .map(|l| column_to_screen_width(l, doc.col))
        .unwrap_or(0);
    if screen_col < doc.left {
        surface.hide_cursor();
        return;
    }
    let x = state.gutter_width() + screen_col - doc.left;
    if x >= layout.width {
        surface.hide_cursor();
        return;
    }
    let y = EDITOR_Y + doc.row - doc.top;
    surface.set_cursor(x as u16, y as u16);
}

/// Clamp a row of cells to the frame width, accounting for wide glyphs.
trait TruncateToWidth {
    fn truncate_to_width(&mut self, width: usize);
}

impl TruncateToWidth for Vec<Cell> {
    fn truncate_to_width(&mut self, width: usize) {
        let mut used = 0usize;
        let mut keep = self.len();
        for (i, c) in self.iter().enumerate() {
            used += char_width(c.ch);
            if used > width {
                keep = i;
                break;
            }
        }
        self.truncate(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Document, EditorState, Selection, ViewDims};
    use core_text::LineStore;

    /// In-memory surface capturing drawn rows as plain text plus a style
    /// grid, for asserting on painter output.
    struct TestSurface {
        w: u16,
        h: u16,
        rows: Vec<Vec<Cell>>,
        cursor: Option<(u16, u16)>,
    }

    impl TestSurface {
        fn new(w: u16, h: u16) -> Self {
            Self {
                w,
                h,
                rows: vec![Vec::new(); h as usize],
                cursor: None,
            }
        }

        fn row_text(&self, y: usize) -> String {
            self.rows[y].iter().map(|c| c.ch).collect()
        }
    }

    impl Surface for TestSurface {
        fn size(&self) -> (u16, u16) {
            (self.w, self.h)
        }
        fn draw_cells(&mut self, x: u16, y: u16, cells: &[Cell]) {
            assert_eq!(x, 0, "painter draws whole rows");
            self.rows[y as usize] = cells.to_vec();
        }
        fn set_cursor(&mut self, x: u16, y: u16) {
            self.cursor = Some((x, y));
        }
        fn hide_cursor(&mut self) {
            self.cursor = None;
        }
        fn present(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn state_with(lines: &[&str]) -> EditorState {
        let doc = Document::with_store(LineStore::from_lines(lines.iter().copied()), None);
        let mut st = EditorState::new(doc);
        st.dims = ViewDims {
            width: 40,
            height: 5,
        };
        st
    }

    #[test]
    fn frame_paints_tab_bar_gutter_and_status() {
        let mut st = state_with(&["alpha", "beta"]);
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, None);

        assert!(surface.row_text(0).starts_with("untitled x| "));
        // Gutter: 1 digit + 2 padding, then the line
        assert!(surface.row_text(1).starts_with(" 1 alpha"));
        assert!(surface.row_text(2).starts_with(" 2 beta"));
        assert!(surface.row_text(6).starts_with("Line 1, Column 1"));
        assert_eq!(surface.cursor, Some((3, 1)), "cursor after the gutter");
    }

    #[test]
    fn selection_span_styled_on_its_rows() {
        let mut st = state_with(&["hello world"]);
        st.line_number = false;
        st.doc_mut().set_selection(Selection {
            start_row: 0,
            start_col: 0,
            end_row: 0,
            end_col: 5,
        });
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, None);
        let row = &surface.rows[1];
        assert!(row[..5].iter().all(|c| c.style == Style::Selection));
        assert_eq!(row[5].style, Style::Text);
    }

    #[test]
    fn pending_hint_rendered_dim_after_cursor_line() {
        use core_state::Hint;
        let mut st = state_with(&["Hand"]);
        st.line_number = false;
        st.doc_mut().col = 4;
        st.doc_mut().hint = Some(Hint {
            text: "Handler".into(),
            off: 4,
        });
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, None);
        let row = &surface.rows[1];
        assert!(surface.row_text(1).starts_with("Handler"));
        assert_eq!(row[3].style, Style::Text);
        assert!(row[4..7].iter().all(|c| c.style == Style::Dim));
    }

    #[test]
    fn tabs_render_expanded_and_horizontal_scroll_applies() {
        let mut st = state_with(&["\tabc"]);
        st.line_number = false;
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, None);
        assert!(surface.row_text(1).starts_with("    abc"));

        st.doc_mut().left = 4;
        draw_frame(&mut surface, &mut st, None);
        assert!(surface.row_text(1).starts_with("abc"));
    }

    #[test]
    fn console_row_and_cursor_when_console_focused() {
        let mut st = state_with(&["x"]);
        let console = core_console::Console::with_text(":12");
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, Some(&console));
        assert!(surface.row_text(7).starts_with(":12"));
        assert_eq!(surface.cursor, Some((3, 7)));
    }

    #[test]
    fn candidates_fill_status_row_with_selection_highlight() {
        let mut st = state_with(&["x"]);
        let mut console = core_console::Console::with_text("@h");
        console.set_candidates(vec!["Handler".into(), "hook".into()], Some(1));
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, Some(&console));
        let row = &surface.rows[6];
        let text = surface.row_text(6);
        assert!(text.starts_with("Handler hook"));
        assert_eq!(row[0].style, Style::Bar);
        assert_eq!(row[8].style, Style::Highlight, "selected candidate");
    }

    #[test]
    fn cursor_hidden_when_scrolled_out_of_view() {
        let lines: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut st = state_with(&refs);
        st.doc_mut().top = 20; // cursor at row 0, viewport elsewhere
        let mut surface = TestSurface::new(40, 8);
        draw_frame(&mut surface, &mut st, None);
        assert_eq!(surface.cursor, None);
    }
}
