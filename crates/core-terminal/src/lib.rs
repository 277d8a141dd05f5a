//! Terminal session management: raw mode, alternate screen, mouse capture.
//!
//! Every exit path must restore the terminal: normal return, error return,
//! and panic. [`TerminalSession`] is an RAII value; acquiring it switches the
//! terminal into editor mode and dropping it (however the scope ends) puts
//! the terminal back.

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;

/// Live raw-mode terminal session. Restores cooked mode on drop.
pub struct TerminalSession {
    restored: bool,
}

impl TerminalSession {
    /// Switch the terminal into raw mode on the alternate screen with mouse
    /// reporting enabled.
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self { restored: false })
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    /// Explicit restore, for callers that want to surface errors instead of
    /// relying on drop.
    pub fn restore(&mut self) -> Result<()> {
        if !self.restored {
            self.restored = true;
            execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
