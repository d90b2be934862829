use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::Binding;

/// Where the text of an inline editor goes once applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    /// Replace the value bound to the row.
    Value(Binding),
    /// Insert a new key into the map bound to the row.
    NewKey(Binding),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Changed,
    Submit,
    Cancel,
    Ignored,
}

/// Single-line text editor with a char cursor.
#[derive(Debug, Clone)]
pub struct LineInput {
    pub target: InputTarget,
    buffer: Vec<char>,
    cursor: usize,
}

impl LineInput {
    pub fn new(target: InputTarget, initial: &str) -> Self {
        let buffer: Vec<char> = initial.chars().collect();
        let cursor = buffer.len();
        Self {
            target,
            buffer,
            cursor,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|ch| *ch != '\n' && *ch != '\r') {
            self.buffer.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEvent {
        match key.code {
            KeyCode::Enter => return InputEvent::Submit,
            KeyCode::Esc => return InputEvent::Cancel,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch) => {
                self.buffer.insert(self.cursor, ch);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.buffer.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.buffer.len() => {
                self.buffer.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => return InputEvent::Ignored,
        }
        InputEvent::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut LineInput, code: KeyCode) -> InputEvent {
        input.handle_key(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn edits_at_the_cursor() {
        let mut input = LineInput::new(InputTarget::Value(Binding::top("k")), "héllo");
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Delete);
        press(&mut input, KeyCode::Char('H'));
        press(&mut input, KeyCode::End);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.text(), "Héll");
        assert_eq!(press(&mut input, KeyCode::Enter), InputEvent::Submit);
        assert_eq!(press(&mut input, KeyCode::F(2)), InputEvent::Ignored);
    }

    #[test]
    fn pasted_text_drops_newlines() {
        let mut input = LineInput::new(InputTarget::NewKey(Binding::top("env")), "");
        input.insert_str("A\nB");
        assert_eq!(input.text(), "AB");
        assert_eq!(input.cursor(), 2);
    }
}
