//! Crossterm-backed [`Surface`] implementation.
//!
//! Output is queued and flushed once per frame in `present`, so a frame is a
//! single write burst regardless of how many rows the painter touches.

use crate::{Cell, Style, Surface};
use anyhow::Result;
use crossterm::style::{Color, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue};
use std::io::{Stdout, Write, stdout};

pub struct CrosstermSurface {
    out: Stdout,
    /// Cursor placement requested for this frame; `None` hides it.
    pending_cursor: Option<(u16, u16)>,
}

impl Default for CrosstermSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermSurface {
    pub fn new() -> Self {
        Self {
            out: stdout(),
            pending_cursor: None,
        }
    }
}

fn colors(style: Style) -> (Color, Color) {
    match style {
        Style::Text => (Color::Reset, Color::Reset),
        Style::Bar => (Color::Grey, Color::DarkBlue),
        Style::Dim => (Color::DarkGrey, Color::Reset),
        Style::Selection => (Color::Black, Color::Blue),
        Style::ActiveGutter => (Color::White, Color::DarkGrey),
        Style::Highlight => (Color::Black, Color::Cyan),
    }
}

impl Surface for CrosstermSurface {
    fn size(&self) -> (u16, u16) {
        crossterm::terminal::size().unwrap_or((80, 24))
    }

    fn draw_cells(&mut self, x: u16, y: u16, cells: &[Cell]) {
        let _ = queue!(self.out, cursor::MoveTo(x, y));
        let mut current: Option<Style> = None;
        for cell in cells {
            if current != Some(cell.style) {
                let (fg, bg) = colors(cell.style);
                let _ = queue!(self.out, SetForegroundColor(fg), SetBackgroundColor(bg));
                current = Some(cell.style);
            }
            let _ = queue!(self.out, crossterm::style::Print(cell.ch));
        }
        let _ = queue!(
            self.out,
            SetForegroundColor(Color::Reset),
            SetBackgroundColor(Color::Reset)
        );
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.pending_cursor = Some((x, y));
    }

    fn hide_cursor(&mut self) {
        self.pending_cursor = None;
    }

    fn present(&mut self) -> Result<()> {
        match self.pending_cursor {
            Some((x, y)) => {
                queue!(self.out, cursor::MoveTo(x, y), cursor::Show)?;
            }
            None => {
                queue!(self.out, cursor::Hide)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
