//! Render surface boundary and frame layout.
//!
//! The editor never talks to the terminal directly: it produces rows of
//! styled cells through the [`Surface`] trait, injected at construction. The
//! crossterm-backed implementation lives in [`writer`]; tests substitute an
//! in-memory grid.

use anyhow::Result;

pub mod frame;
pub mod writer;

/// Styling palette for cells. The writer maps these to terminal colors; the
/// painter never deals in colors directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Document text.
    Text,
    /// Tab bar and status chrome.
    Bar,
    /// De-emphasized: inactive gutter numbers, hints, placeholders.
    Dim,
    /// Selected text span.
    Selection,
    /// Gutter number of the cursor row.
    ActiveGutter,
    /// Active tab name, selected candidate.
    Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    pub fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

/// Where frames are drawn. `draw_cells` paints one run of cells starting at
/// (x, y); the implementation owns flushing and physical cursor state.
pub trait Surface {
    /// Current (columns, rows).
    fn size(&self) -> (u16, u16);
    fn draw_cells(&mut self, x: u16, y: u16, cells: &[Cell]);
    fn set_cursor(&mut self, x: u16, y: u16);
    fn hide_cursor(&mut self);
    /// Make everything drawn since the last call visible.
    fn present(&mut self) -> Result<()>;
}

/// Vertical frame layout: tab bar, editor rows, status row, console row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: usize,
    pub editor_height: usize,
    pub status_y: usize,
    pub console_y: usize,
}

/// Screen row of the first editor line.
pub const EDITOR_Y: usize = 1;

impl Layout {
    pub fn new(width: u16, height: u16) -> Self {
        let width = width as usize;
        let height = height as usize;
        let editor_height = height.saturating_sub(3);
        Self {
            width,
            editor_height,
            status_y: EDITOR_Y + editor_height,
            console_y: EDITOR_Y + editor_height + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_reserves_three_chrome_rows() {
        let l = Layout::new(80, 24);
        assert_eq!(l.editor_height, 21);
        assert_eq!(l.status_y, 22);
        assert_eq!(l.console_y, 23);
    }

    #[test]
    fn layout_survives_tiny_terminals() {
        let l = Layout::new(10, 2);
        assert_eq!(l.editor_height, 0);
    }
}
