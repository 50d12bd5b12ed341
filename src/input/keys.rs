//! The shared key table.
//!
//! Both routers and the state machine's `key_navigate` speak this one
//! vocabulary; raw `crossterm` events are classified exactly once.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Classified key, the unit of the routing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Arrow down
    Down,
    /// Arrow up
    Up,
    /// Enter / Return
    Enter,
    /// Tab (and BackTab)
    Tab,
    /// Escape
    Escape,
    /// Backspace
    Backspace,
    /// Space bar
    Space,
    /// Any other printable character
    Char(char),
    /// Function key F1..F12
    Function(u8),
    /// Any chord holding Ctrl/Alt/Super/Meta
    Modifier,
    /// Everything else (Home, End, PageUp, ...)
    Other,
}

impl From<&KeyEvent> for Key {
    fn from(event: &KeyEvent) -> Self {
        // Modifier chords pass through untouched regardless of the base
        // key; Shift alone still produces a printable character.
        if event.modifiers.intersects(
            KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META,
        ) {
            return Self::Modifier;
        }
        match event.code {
            KeyCode::Down => Self::Down,
            KeyCode::Up => Self::Up,
            KeyCode::Enter => Self::Enter,
            KeyCode::Tab | KeyCode::BackTab => Self::Tab,
            KeyCode::Esc => Self::Escape,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Char(' ') => Self::Space,
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::F(n) => Self::Function(n),
            _ => Self::Other,
        }
    }
}
