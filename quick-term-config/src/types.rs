//! Configuration enums for the quick terminal.

use serde::{Deserialize, Serialize};

// ============================================================================
// Anchor Position
// ============================================================================

/// Screen edge (or center) the quick terminal slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuickTerminalPosition {
    /// Slides down from the top edge (default)
    #[default]
    Top,
    /// Slides up from the bottom edge
    Bottom,
    /// Slides in from the left edge
    Left,
    /// Slides in from the right edge
    Right,
    /// Fades in at the center of the screen
    Center,
}

impl QuickTerminalPosition {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            QuickTerminalPosition::Top => "Top",
            QuickTerminalPosition::Bottom => "Bottom",
            QuickTerminalPosition::Left => "Left",
            QuickTerminalPosition::Right => "Right",
            QuickTerminalPosition::Center => "Center",
        }
    }

    /// All positions for UI iteration
    pub fn all() -> &'static [QuickTerminalPosition] {
        &[
            QuickTerminalPosition::Top,
            QuickTerminalPosition::Bottom,
            QuickTerminalPosition::Left,
            QuickTerminalPosition::Right,
            QuickTerminalPosition::Center,
        ]
    }

    /// Returns true for positions that span the full screen width
    pub fn is_horizontal_edge(&self) -> bool {
        matches!(
            self,
            QuickTerminalPosition::Top | QuickTerminalPosition::Bottom
        )
    }

    /// Returns true for positions that span the full screen height
    pub fn is_vertical_edge(&self) -> bool {
        matches!(
            self,
            QuickTerminalPosition::Left | QuickTerminalPosition::Right
        )
    }
}

// ============================================================================
// Target Screen
// ============================================================================

/// Which screen the quick terminal appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuickTerminalScreen {
    /// The screen that currently has keyboard focus (default)
    #[default]
    Main,
    /// The screen under the mouse cursor
    Mouse,
    /// The screen that hosts the menu bar
    MenuBar,
}

// ============================================================================
// Space Behavior
// ============================================================================

/// How the quick terminal reacts when the user switches virtual desktops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpaceBehavior {
    /// Stay on the desktop it was shown on; leaving the desktop hides it
    Remain,
    /// Follow the user to the newly active desktop (default)
    #[default]
    Move,
}
