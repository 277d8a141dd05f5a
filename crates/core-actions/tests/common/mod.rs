// Not every test binary exercises every helper.
#![allow(dead_code)]

use core_actions::{DispatchResult, Dispatcher};
use core_console::Console;
use core_events::{
    CommandSender, InputEvent, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind,
    command_queue,
};
use core_state::{Document, EditorState, ViewDims};
use core_text::LineStore;

/// Minimal editor harness: state + console slot + dispatcher + command queue.
pub struct Harness {
    pub state: EditorState,
    pub console: Option<Console>,
    pub dispatcher: Dispatcher,
    pub commands: CommandSender,
    pub queue: crossbeam_channel::Receiver<String>,
}

impl Harness {
    pub fn with_lines(lines: &[&str]) -> Self {
        let doc = Document::with_store(LineStore::from_lines(lines.iter().copied()), None);
        let mut state = EditorState::new(doc);
        state.dims = ViewDims {
            width: 80,
            height: 10,
        };
        let (commands, queue) = command_queue();
        Self {
            state,
            console: None,
            dispatcher: Dispatcher::new(),
            commands,
            queue,
        }
    }

    pub fn key(&mut self, code: KeyCode) -> DispatchResult {
        self.dispatcher.dispatch(
            &mut self.state,
            &mut self.console,
            InputEvent::Key(KeyEvent::plain(code)),
            &self.commands,
        )
    }

    pub fn ch(&mut self, c: char) -> DispatchResult {
        self.key(KeyCode::Char(c))
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.ch(c);
        }
    }

    pub fn ctrl(&mut self, c: char) -> DispatchResult {
        self.dispatcher.dispatch(
            &mut self.state,
            &mut self.console,
            InputEvent::Key(KeyEvent::ctrl(c)),
            &self.commands,
        )
    }

    pub fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> DispatchResult {
        self.dispatcher.dispatch(
            &mut self.state,
            &mut self.console,
            InputEvent::Mouse(MouseEvent { kind, column, row }),
            &self.commands,
        )
    }

    pub fn click(&mut self, column: u16, row: u16) -> DispatchResult {
        self.mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    /// Wait out the paste-detection gap so the next Enter is treated as a
    /// human keystroke rather than part of a terminal paste.
    pub fn settle(&self) {
        std::thread::sleep(std::time::Duration::from_millis(15));
    }

    pub fn text(&self) -> String {
        self.state.doc().store.to_text()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.state.doc().row, self.state.doc().col)
    }
}

