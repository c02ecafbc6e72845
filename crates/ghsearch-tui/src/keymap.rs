// Terminal key events to browse-session key tokens
use crate::session::KeyToken;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Classify one key press. Unknown keys map to `KeyToken::Other`.
pub fn token_for(key: KeyEvent) -> KeyToken {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyToken::ForceQuit,
            KeyCode::Char('d') => KeyToken::HalfPageDown,
            KeyCode::Char('u') => KeyToken::HalfPageUp,
            KeyCode::Char('f') => KeyToken::PageDown,
            KeyCode::Char('b') => KeyToken::PageUp,
            _ => KeyToken::Other,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyToken::Quit,
        KeyCode::Char('j') | KeyCode::Down => KeyToken::Down,
        KeyCode::Char('k') | KeyCode::Up => KeyToken::Up,
        KeyCode::Char(' ') | KeyCode::PageDown => KeyToken::PageDown,
        KeyCode::PageUp => KeyToken::PageUp,
        KeyCode::Char('g') => KeyToken::ChordTop,
        KeyCode::Home => KeyToken::Home,
        KeyCode::Char('G') | KeyCode::End => KeyToken::Bottom,
        KeyCode::Char('n') | KeyCode::Char(']') => KeyToken::NextPage,
        KeyCode::Char('p') | KeyCode::Char('[') => KeyToken::PrevPage,
        KeyCode::Enter | KeyCode::Char('o') => KeyToken::Open,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => KeyToken::TabLeft,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => KeyToken::TabRight,
        _ => KeyToken::Other,
    }
}
