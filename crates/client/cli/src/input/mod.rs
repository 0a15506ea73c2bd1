//! Input processing for the CLI demo.
//!
//! This module owns the keyboard mapping so the rest of the demo only sees
//! message log key codes, never `crossterm` events.

use crossterm::event::{KeyCode as RawKey, KeyEvent, KeyModifiers};
use message_log::KeyCode;

/// Convert a crossterm key event into the message log's key code.
pub fn decode(key: KeyEvent) -> KeyCode {
    match key.code {
        RawKey::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyCode::Ctrl(c.to_ascii_lowercase())
        }
        RawKey::Char(c) => KeyCode::Char(c),
        RawKey::Enter => KeyCode::Enter,
        RawKey::Esc => KeyCode::Escape,
        _ => KeyCode::Other,
    }
}

/// High-level outcome of a key press at the demo's command prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoCommand {
    /// Exit the demo.
    Quit,
    /// Play one round of random combat notices.
    CombatRound,
    /// Repeat the tail of the last notice.
    Repeat,
    /// Show a room description long enough to wrap.
    Describe,
    /// Open the full message recall viewer.
    Recall,
    /// Show the newest message on the message row.
    QuickRecall,
    /// Clear the whole screen.
    ClearScreen,
    /// Show the key help prompt.
    Help,
    /// No meaningful command was produced.
    None,
}

pub fn command_for(key: KeyCode) -> DemoCommand {
    match key {
        KeyCode::Char('q') => DemoCommand::Quit,
        KeyCode::Char('a') | KeyCode::Char(' ') => DemoCommand::CombatRound,
        KeyCode::Char('r') => DemoCommand::Repeat,
        KeyCode::Char('l') => DemoCommand::Describe,
        KeyCode::Ctrl('p') => DemoCommand::Recall,
        KeyCode::Char('m') => DemoCommand::QuickRecall,
        KeyCode::Char('c') | KeyCode::Ctrl('l') => DemoCommand::ClearScreen,
        KeyCode::Char('?') => DemoCommand::Help,
        _ => DemoCommand::None,
    }
}
