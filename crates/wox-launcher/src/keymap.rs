//! Keystroke to command mapping.
//!
//! Defaults are registered first, then entries from the `[keymap]` config
//! table, so user bindings take precedence.

use std::collections::HashMap;

use crate::events::LauncherEvent;
use crate::model::Direction;

// =============================================================================
// Commands
// =============================================================================

/// Commands a keystroke can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    CursorUp,
    CursorDown,
    Activate,
}

impl KeyCommand {
    /// Look up a command by its config name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cursor_up" => Some(KeyCommand::CursorUp),
            "cursor_down" => Some(KeyCommand::CursorDown),
            "activate" => Some(KeyCommand::Activate),
            _ => None,
        }
    }

    /// The event this command posts.
    pub fn to_event(self) -> LauncherEvent {
        match self {
            KeyCommand::CursorUp => LauncherEvent::Directional(Direction::Up),
            KeyCommand::CursorDown => LauncherEvent::Directional(Direction::Down),
            KeyCommand::Activate => LauncherEvent::Activate,
        }
    }
}

// =============================================================================
// Keystroke Parsing
// =============================================================================

/// Normalise a keystroke for lookup.
///
/// Users write "ctrl+n", "Ctrl-N" or "ctrl-n"; all become "ctrl-n".
fn normalize_keystroke(s: &str) -> String {
    s.trim().to_lowercase().replace('+', "-")
}

// =============================================================================
// Keymap
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<String, KeyCommand>,
}

impl Keymap {
    /// An empty keymap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrow keys, Enter, and Emacs-style ctrl+p / ctrl+n.
    pub fn with_defaults() -> Self {
        let mut keymap = Self::new();
        keymap.bind("up", KeyCommand::CursorUp);
        keymap.bind("down", KeyCommand::CursorDown);
        keymap.bind("ctrl+p", KeyCommand::CursorUp);
        keymap.bind("ctrl+n", KeyCommand::CursorDown);
        keymap.bind("enter", KeyCommand::Activate);
        keymap
    }

    /// Bind a keystroke, replacing any existing binding.
    pub fn bind(&mut self, key: &str, command: KeyCommand) {
        self.bindings.insert(normalize_keystroke(key), command);
    }

    /// Layer `[keymap]` config entries over the current bindings.
    ///
    /// Unknown command names are logged and skipped. Returns how many
    /// bindings were applied.
    pub fn apply_config(&mut self, entries: &HashMap<String, String>) -> usize {
        let mut applied = 0;
        for (key, name) in entries {
            match KeyCommand::from_name(name) {
                Some(command) => {
                    self.bind(key, command);
                    tracing::debug!("Registered binding: {} -> {}", key, name);
                    applied += 1;
                }
                None => tracing::warn!("Unknown command for '{}': {}", key, name),
            }
        }
        applied
    }

    /// Find the command bound to a keystroke.
    pub fn resolve(&self, key: &str) -> Option<KeyCommand> {
        self.bindings.get(&normalize_keystroke(key)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
