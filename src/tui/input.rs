//! Translation of terminal input into session events.

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::state::{Event, Key};

/// Maps one terminal event, returning `None` for events the session ignores.
#[must_use]
pub fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) => map_key(key).map(Event::Key),
        TermEvent::Paste(text) => Some(Event::Paste(text)),
        TermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        TermEvent::FocusGained | TermEvent::FocusLost | TermEvent::Mouse(_) => None,
    }
}

/// Maps a key press. Releases and repeats are dropped.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global quit
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(match key.code {
            KeyCode::Char('c') => Key::ForceQuit,
            _ => Key::Other,
        });
    }

    Some(match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    })
}
