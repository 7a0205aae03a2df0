//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! host's key name (`"z"`, `"Delete"`, `"Escape"`), matched case-insensitively
//! for letters. Text editing swallows keys before they reach this map.

use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    /// Remove the active drawable.
    Delete,
    /// Leave text editing, or clear the selection.
    Escape,
    Tool(ToolKind),
}

/// Resolves key events into shortcut actions.
///
/// Ctrl and ⌘ are interchangeable so the same table serves every platform.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, `None` if the combo is unbound.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ⌘+Backspace is the usual macOS delete; modifiers never block it.
        if matches!(key, "Delete" | "Backspace") {
            return Some(ShortcutAction::Delete);
        }

        if cmd {
            if shift || alt {
                return None;
            }
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if key == "Escape" {
            return Some(ShortcutAction::Escape);
        }

        if shift || alt {
            return None;
        }

        let tool = match key {
            "v" | "V" => ToolKind::Select,
            "p" | "P" => ToolKind::Draw,
            "r" | "R" => ToolKind::Rectangle,
            "o" | "O" => ToolKind::Ellipse,
            "g" | "G" => ToolKind::Triangle,
            "c" | "C" => ToolKind::Connector,
            "t" | "T" => ToolKind::Text,
            "i" | "I" => ToolKind::Image,
            "e" | "E" => ToolKind::Eraser,
            "f" | "F" => ToolKind::Flowchart,
            _ => return None,
        };
        Some(ShortcutAction::Tool(tool))
    }
}
