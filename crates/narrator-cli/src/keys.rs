//! Keyboard surface of the interactive player.
//!
//! Shortcuts only apply while the player itself has focus. Once the jump
//! input is open every key edits the input instead, so typing a unit
//! number never toggles playback or skips ahead.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What currently receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    /// The player: shortcuts are live.
    Player,
    /// A text input (the jump prompt): shortcuts are suppressed.
    TextInput,
}

/// A transport or view action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    TogglePlayback,
    Next,
    Prev,
    SpeedUp,
    SpeedDown,
    CycleVoice,
    ToggleFocusMode,
    OpenJump,
    Help,
    Quit,
}

/// Map a key press to an action.
///
/// Returns `None` for unbound keys, key releases, and every key while a
/// text input has focus. Ctrl+C always quits, since raw mode swallows the
/// signal.
pub fn map_key(key: &KeyEvent, focus: InputFocus) -> Option<ShellAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(ShellAction::Quit);
    }
    if focus == InputFocus::TextInput {
        return None;
    }

    let action = match key.code {
        KeyCode::Char(' ') => ShellAction::TogglePlayback,
        KeyCode::Right | KeyCode::Char('l') => ShellAction::Next,
        KeyCode::Left | KeyCode::Char('h') => ShellAction::Prev,
        KeyCode::Char('+' | '=') | KeyCode::Up => ShellAction::SpeedUp,
        KeyCode::Char('-') | KeyCode::Down => ShellAction::SpeedDown,
        KeyCode::Char('v') => ShellAction::CycleVoice,
        KeyCode::Char('f') => ShellAction::ToggleFocusMode,
        KeyCode::Char('g') => ShellAction::OpenJump,
        KeyCode::Char('?') => ShellAction::Help,
        KeyCode::Char('q') | KeyCode::Esc => ShellAction::Quit,
        _ => return None,
    };
    Some(action)
}

// ── Jump input ─────────────────────────────────────────────────────

const MAX_JUMP_DIGITS: usize = 4;

/// Result of feeding a key to the jump input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Still typing.
    Editing,
    /// Enter pressed on a valid 1-based number; carries the 0-based index.
    Submit(usize),
    /// Enter pressed on an empty or zero entry.
    Invalid,
    /// Esc pressed.
    Cancel,
}

/// Line editor for the "jump to unit" prompt. Accepts digits only.
#[derive(Debug, Default)]
pub struct JumpInput {
    buffer: String,
}

impl JumpInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text of the input.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn handle(&mut self, key: &KeyEvent) -> JumpOutcome {
        if key.kind != KeyEventKind::Press {
            return JumpOutcome::Editing;
        }
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && self.buffer.len() < MAX_JUMP_DIGITS => {
                self.buffer.push(c);
                JumpOutcome::Editing
            }
            KeyCode::Backspace => {
                self.buffer.pop();
                JumpOutcome::Editing
            }
            KeyCode::Enter => match self.buffer.parse::<usize>() {
                Ok(n) if n > 0 => JumpOutcome::Submit(n - 1),
                _ => JumpOutcome::Invalid,
            },
            KeyCode::Esc => JumpOutcome::Cancel,
            _ => JumpOutcome::Editing,
        }
    }
}
