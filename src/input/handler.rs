use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::action::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};

/// What a key press means on the menu, high-score and game screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Arrow key code (37-40) to feed into the input queue
    Steer(u32),
    Play,
    ShowHighScores,
    Back,
    Quit,
    None,
}

/// What a key press means while typing a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAction {
    Insert(char),
    Delete,
    Submit,
    Cancel,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Ctrl+C
    pub fn is_interrupt(&self, key: KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if self.is_interrupt(key) {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(KEY_UP),
            KeyCode::Down => KeyAction::Steer(KEY_DOWN),
            KeyCode::Left => KeyAction::Steer(KEY_LEFT),
            KeyCode::Right => KeyAction::Steer(KEY_RIGHT),

            // Movement - WASD, translated to the matching arrow codes
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(KEY_UP),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(KEY_DOWN),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(KEY_LEFT),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(KEY_RIGHT),

            // Menu
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Play,
            KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::ShowHighScores,
            KeyCode::Esc => KeyAction::Back,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    /// Name entry accepts letters and digits, upper-cased
    pub fn handle_text_key(&self, key: KeyEvent) -> TextAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return TextAction::None;
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
                TextAction::Insert(c.to_ascii_uppercase())
            }
            KeyCode::Backspace => TextAction::Delete,
            KeyCode::Enter => TextAction::Submit,
            KeyCode::Esc => TextAction::Cancel,
            _ => TextAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
