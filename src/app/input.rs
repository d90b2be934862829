use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key does while the table has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Save,
    Quit,
    Reload,
    NextRow,
    PrevRow,
    PageDown,
    PageUp,
    Activate,
    Remove,
    Reveal,
    ResetStatus,
    None,
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => KeyCommand::Save,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyCommand::Reload,
            KeyCode::Char('t') | KeyCode::Char('T') => KeyCommand::Reveal,
            _ => KeyCommand::None,
        };
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => KeyCommand::NextRow,
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => KeyCommand::PrevRow,
        KeyCode::PageDown => KeyCommand::PageDown,
        KeyCode::PageUp => KeyCommand::PageUp,
        KeyCode::Enter | KeyCode::Char(' ') => KeyCommand::Activate,
        KeyCode::Delete | KeyCode::Char('d') => KeyCommand::Remove,
        KeyCode::Esc => KeyCommand::ResetStatus,
        _ => KeyCommand::None,
    }
}

/// Answer to a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAnswer {
    Confirm,
    Cancel,
    None,
}

pub fn classify_dialog(key: &KeyEvent) -> DialogAnswer {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => DialogAnswer::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => DialogAnswer::Cancel,
        _ => DialogAnswer::None,
    }
}

pub const HELP_TEXT: &str =
    "↑/↓ move • Enter edit/expand • Del remove • Ctrl+T reveal • Ctrl+S save • Ctrl+R reload • Ctrl+Q quit";
