//! Keyboard controls
//!
//! Letters and digits "sign" in front of the simulated camera, except on the
//! on-screen keyboard where they type. Arrow keys walk the visible buttons.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use senyas_core::InputEvent;
use senyas_runtime::{DisplayList, DrawCommand};

/// Phrases on F5..F8
pub const PHRASE_KEYS: [&str; 4] = ["hello", "thankyou", "iloveyou", "sorry"];

/// What a key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Input(InputEvent),
    Sign(String),
    LowerHands,
    MoveSelection(isize),
    ActivateSelected,
    Ignore,
}

pub fn map_key(key: KeyEvent, typing: bool) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Input(InputEvent::Quit);
    }
    match key.code {
        KeyCode::Esc => Action::Input(InputEvent::Quit),
        KeyCode::Tab => Action::Input(InputEvent::Skip),
        KeyCode::F(2) => Action::Input(InputEvent::ToggleDebug),
        KeyCode::F(n @ 5..=8) => Action::Sign(PHRASE_KEYS[usize::from(n - 5)].to_string()),
        KeyCode::Up | KeyCode::Left => Action::MoveSelection(-1),
        KeyCode::Down | KeyCode::Right => Action::MoveSelection(1),
        KeyCode::Enter if typing => Action::Input(InputEvent::Submit),
        KeyCode::Enter => Action::ActivateSelected,
        KeyCode::Backspace if typing => Action::Input(InputEvent::Backspace),
        KeyCode::Char(c) if typing => Action::Input(InputEvent::Char(c)),
        KeyCode::Char(' ') => Action::LowerHands,
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
            Action::Sign(c.to_ascii_uppercase().to_string())
        }
        _ => Action::Ignore,
    }
}

/// Buttons of the last frame, in draw order
pub fn buttons(display: &DisplayList) -> Vec<&str> {
    display
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Button { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

/// Cursor over the visible buttons
#[derive(Debug, Default)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move and return the hover event for the new button
    pub fn step(&mut self, delta: isize, buttons: &[&str]) -> Option<InputEvent> {
        if buttons.is_empty() {
            return None;
        }
        let len = buttons.len() as isize;
        let current = (self.index as isize).min(len - 1);
        self.index = (current + delta).rem_euclid(len) as usize;
        Some(InputEvent::hover(buttons[self.index]))
    }

    pub fn activate(&self, buttons: &[&str]) -> Option<InputEvent> {
        buttons.get(self.index).map(|name| InputEvent::activate(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_sign_or_type() {
        assert_eq!(map_key(key(KeyCode::Char('b')), false), Action::Sign("B".into()));
        assert_eq!(map_key(key(KeyCode::Char('7')), false), Action::Sign("7".into()));
        assert_eq!(
            map_key(key(KeyCode::Char('b')), true),
            Action::Input(InputEvent::Char('b'))
        );
        assert_eq!(map_key(key(KeyCode::F(6)), false), Action::Sign("thankyou".into()));
    }

    #[test]
    fn test_enter_depends_on_mode() {
        assert_eq!(map_key(key(KeyCode::Enter), false), Action::ActivateSelected);
        assert_eq!(
            map_key(key(KeyCode::Enter), true),
            Action::Input(InputEvent::Submit)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), true),
            Action::Input(InputEvent::Quit)
        );
    }

    #[test]
    fn test_selection_wraps() {
        let buttons = ["cosmic", "galaxy", "star"];
        let mut selection = Selection::default();
        assert_eq!(selection.step(-1, &buttons), Some(InputEvent::hover("star")));
        assert_eq!(selection.step(1, &buttons), Some(InputEvent::hover("cosmic")));
        assert_eq!(selection.activate(&buttons), Some(InputEvent::activate("cosmic")));
        assert_eq!(selection.step(1, &[]), None);
    }
}
