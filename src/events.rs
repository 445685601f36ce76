//! Typed message contracts for the quick terminal.
//!
//! Hotkeys, menu items, the host's application delegate and the terminal
//! engine all talk to the quick terminal by publishing a
//! [`QuickTerminalEvent`] on an [`EventBus`]. [`crate::QuickTerminal`] drains
//! the receiving end once per loop iteration and routes each variant to a
//! single handler.

use crate::config::Config;
use crate::platform::{AppHandle, SurfaceId};
use crate::tab::TabId;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Target of a goto-tab command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoTab {
    Previous,
    Next,
    Last,
}

/// Every message the quick terminal reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum QuickTerminalEvent {
    /// Global hotkey: show when hidden, hide when shown
    Toggle,
    NewTab,
    CloseTab(TabId),
    /// Move the active tab by a signed number of positions.
    /// Ignored unless `surface` is the focused surface.
    MoveTab { surface: SurfaceId, amount: isize },
    /// Ignored unless `surface` is the focused surface
    GotoTab { surface: SurfaceId, target: GotoTab },
    /// Ignored unless `surface` is the focused surface
    ToggleFullscreen { surface: SurfaceId },
    /// The overlay window resigned key status
    FocusLost,
    /// The overlay window became key
    FocusGained,
    ConfigChanged(Config),
    ApplicationWillTerminate,
    /// Some other application quit
    ApplicationTerminated(AppHandle),
    /// A surface's child process exited
    SurfaceExited(SurfaceId),
}

/// Sending half of the quick terminal event channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Sender<QuickTerminalEvent>,
}

impl EventBus {
    /// Create a bus and the receiver that drains it
    pub fn channel() -> (Self, Receiver<QuickTerminalEvent>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }

    /// Publish an event. Events sent after the quick terminal is gone are
    /// dropped.
    pub fn publish(&self, event: QuickTerminalEvent) {
        log::trace!("Publishing {:?}", event);
        if self.sender.send(event).is_err() {
            log::debug!("Quick terminal event dropped: receiver closed");
        }
    }

    pub fn toggle(&self) {
        self.publish(QuickTerminalEvent::Toggle);
    }

    pub fn new_tab(&self) {
        self.publish(QuickTerminalEvent::NewTab);
    }

    pub fn move_tab(&self, surface: SurfaceId, amount: isize) {
        self.publish(QuickTerminalEvent::MoveTab { surface, amount });
    }

    pub fn goto_tab(&self, surface: SurfaceId, target: GotoTab) {
        self.publish(QuickTerminalEvent::GotoTab { surface, target });
    }
}
