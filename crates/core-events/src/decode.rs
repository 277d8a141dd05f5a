//! Translation from crossterm events to the logical event model.
//!
//! Keeps the crossterm surface area confined to this module so the dispatcher
//! and tests work entirely with [`InputEvent`].

use crate::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::event as ct;

/// Decode a crossterm event. Returns `None` for events the editor does not
/// consume (focus changes, key releases, bracketed paste markers).
pub fn decode(ev: ct::Event) -> Option<InputEvent> {
    match ev {
        ct::Event::Key(k) if k.kind != ct::KeyEventKind::Release => {
            decode_key(k).map(InputEvent::Key)
        }
        ct::Event::Mouse(m) => decode_mouse(m).map(InputEvent::Mouse),
        ct::Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
        _ => None,
    }
}

fn decode_mods(mods: ct::KeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(ct::KeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(ct::KeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(ct::KeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    if mods.contains(ct::KeyModifiers::META) || mods.contains(ct::KeyModifiers::SUPER) {
        out |= KeyModifiers::META;
    }
    out
}

fn decode_key(k: ct::KeyEvent) -> Option<KeyEvent> {
    let code = match k.code {
        ct::KeyCode::Char(c) => KeyCode::Char(c),
        ct::KeyCode::Enter => KeyCode::Enter,
        ct::KeyCode::Esc => KeyCode::Esc,
        ct::KeyCode::Backspace => KeyCode::Backspace,
        ct::KeyCode::Tab => KeyCode::Tab,
        ct::KeyCode::BackTab => KeyCode::BackTab,
        ct::KeyCode::Up => KeyCode::Up,
        ct::KeyCode::Down => KeyCode::Down,
        ct::KeyCode::Left => KeyCode::Left,
        ct::KeyCode::Right => KeyCode::Right,
        ct::KeyCode::Home => KeyCode::Home,
        ct::KeyCode::End => KeyCode::End,
        ct::KeyCode::PageUp => KeyCode::PageUp,
        ct::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(KeyEvent {
        code,
        mods: decode_mods(k.modifiers),
    })
}

fn decode_button(b: ct::MouseButton) -> MouseButton {
    match b {
        ct::MouseButton::Left => MouseButton::Left,
        ct::MouseButton::Middle => MouseButton::Middle,
        ct::MouseButton::Right => MouseButton::Right,
    }
}

fn decode_mouse(m: ct::MouseEvent) -> Option<MouseEvent> {
    let kind = match m.kind {
        ct::MouseEventKind::Down(b) => MouseEventKind::Down(decode_button(b)),
        ct::MouseEventKind::Up(b) => MouseEventKind::Up(decode_button(b)),
        ct::MouseEventKind::Drag(b) => MouseEventKind::Drag(decode_button(b)),
        ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent {
        kind,
        column: m.column,
        row: m.row,
    })
}
