//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Plain keys
//! (Delete, arrows) are swallowed while the user is typing into a control
//! or editing text in place; Escape and the Alt combos always resolve.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Selection ──
    Deselect,
    Delete,

    /// Move the selection by one step per unit, the large step with Shift.
    Nudge { dx: i8, dy: i8, large: bool },

    // ── Z-order ──
    BringForward,
    SendBackward,

    // ── Create ──
    AddText,
    /// Ask the host to pick an image file.
    AddImage,
    Duplicate,

    // ── Style ──
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,

    /// Ask the host to run the export flow.
    Save,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"t"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: &Modifiers, typing: bool) -> Option<ShortcutAction> {
        if key == "Escape" {
            return Some(ShortcutAction::Deselect);
        }

        // ── Alt combos (work while typing) ──
        if modifiers.alt && modifiers.shift {
            return match key {
                "i" | "I" => Some(ShortcutAction::ToggleItalic),
                _ => None,
            };
        }

        if modifiers.alt {
            return match key {
                "t" | "T" => Some(ShortcutAction::AddText),
                "i" | "I" => Some(ShortcutAction::AddImage),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "b" | "B" => Some(ShortcutAction::ToggleBold),
                "u" | "U" => Some(ShortcutAction::ToggleUnderline),
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        if typing {
            return None;
        }

        if modifiers.command() {
            return match key {
                "ArrowUp" => Some(ShortcutAction::BringForward),
                "ArrowDown" => Some(ShortcutAction::SendBackward),
                _ => None,
            };
        }

        let large = modifiers.shift;
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "ArrowLeft" => Some(ShortcutAction::Nudge { dx: -1, dy: 0, large }),
            "ArrowRight" => Some(ShortcutAction::Nudge { dx: 1, dy: 0, large }),
            "ArrowUp" => Some(ShortcutAction::Nudge { dx: 0, dy: -1, large }),
            "ArrowDown" => Some(ShortcutAction::Nudge { dx: 0, dy: 1, large }),
            _ => None,
        }
    }
}
