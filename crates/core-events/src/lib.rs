//! Core event types and channel plumbing.
//!
//! Channel policy: the event loop consumes a bounded channel sized by
//! [`EVENT_CHANNEL_CAP`]. The input thread is the only high-rate producer and
//! uses a blocking send, so backpressure parks the reader rather than dropping
//! keystrokes. The command queue is a separate bounded channel of capacity
//! [`COMMAND_QUEUE_CAP`] drained by a single serial consumer; submission is
//! non-blocking so a shortcut issued while a slow command (e.g. save) is still
//! running reports "busy" instead of stalling input handling.

use std::fmt;

pub mod decode;

/// Event channel capacity. Generous: a burst of mouse-drag events must not
/// park the input thread under normal operation.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Pending textual commands awaiting the consumer. Capacity 1 by design:
/// commands execute strictly one at a time, in submission order.
pub const COMMAND_QUEUE_CAP: usize = 1;

/// Top-level event consumed by the input/render loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// The command consumer finished a command outside the loop's own repaint
    /// step and needs the screen refreshed.
    RenderRequested,
}

/// Normalized input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::CTRL,
        }
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && self.code == KeyCode::Char(c)
    }
}

/// Logical key identity after terminal decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL  = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const SHIFT = 0b0000_0100;
        const META  = 0b0000_1000;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Create the bounded event channel shared by the input thread and the
/// command consumer (producers) and the main loop (consumer).
pub fn event_channel() -> (
    crossbeam_channel::Sender<Event>,
    crossbeam_channel::Receiver<Event>,
) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAP)
}

/// Producer half of the command queue. Submission never blocks.
#[derive(Clone)]
pub struct CommandSender {
    tx: crossbeam_channel::Sender<String>,
}

impl CommandSender {
    /// Enqueue a textual command. Returns `false` when the consumer is busy
    /// and the queue slot is taken (the command is dropped, not queued).
    pub fn submit(&self, cmd: impl Into<String>) -> bool {
        let cmd = cmd.into();
        match self.tx.try_send(cmd) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(cmd)) => {
                tracing::warn!(target: "runtime.commands", %cmd, "command_queue_full");
                false
            }
            Err(crossbeam_channel::TrySendError::Disconnected(cmd)) => {
                tracing::warn!(target: "runtime.commands", %cmd, "command_queue_closed");
                false
            }
        }
    }
}

/// Create the capacity-1 command queue.
pub fn command_queue() -> (CommandSender, crossbeam_channel::Receiver<String>) {
    let (tx, rx) = crossbeam_channel::bounded(COMMAND_QUEUE_CAP);
    (CommandSender { tx }, rx)
}
