//! Reactions to key-window changes, configuration reloads and termination.

use super::{DerivedConfig, Deferred, OverlayVisibilityController};
use crate::config::{Config, SpaceBehavior};
use crate::platform::AppHandle;
use std::time::Duration;

impl OverlayVisibilityController {
    /// The overlay window lost key status.
    ///
    /// With auto-hide enabled this hides the overlay, except under the
    /// `move` Space behavior when the loss was caused by a Space switch: then
    /// the overlay follows the user to the new Space.
    pub fn window_did_resign_key(&mut self) {
        // Also fires after hiding; only a visible overlay reacts
        if !self.state.is_visible() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };
        // Alerts and sheets must not dismiss the overlay
        if window.has_attached_sheet() {
            return;
        }

        // Focus moved to another window of the host: nothing to restore
        if self.desktop.is_host_active() {
            self.previous_app = None;
        }

        // The dock comes back whenever we lose focus; the handle is kept so
        // regaining focus can hide it again.
        if let Some(dock) = self.dock_conflict.as_mut() {
            dock.restore();
        }

        if !self.derived_config.autohide {
            return;
        }

        match self.derived_config.space_behavior {
            SpaceBehavior::Remain => self.hide(),
            SpaceBehavior::Move => {
                let current = self.desktop.active_space();
                if current == self.previous_space {
                    // Another app took focus on the same Space
                    self.hide();
                } else {
                    log::debug!(
                        "Space changed {} -> {}; following",
                        self.previous_space,
                        current
                    );
                    self.schedule_transition(Duration::ZERO, Deferred::ReRaise);
                    self.previous_space = current;
                }
            }
        }
    }

    /// The overlay window became key again
    pub fn window_did_become_key(&mut self) {
        if !self.state.is_visible() {
            return;
        }
        if let Some(dock) = self.dock_conflict.as_mut() {
            dock.hide();
        }
    }

    /// Replace the settings snapshot and re-apply appearance only.
    ///
    /// The anchor position is fixed per controller; a changed
    /// `quick_terminal_position` takes effect for the next controller.
    pub fn config_did_change(&mut self, config: &Config) {
        if config.quick_terminal_position != self.position {
            log::info!(
                "quick_terminal_position changed to {}; applies after restart",
                config.quick_terminal_position.display_name()
            );
        }
        self.derived_config = DerivedConfig::new(config);
        log::debug!("Quick terminal config updated: {:?}", self.derived_config);
        self.sync_appearance();
    }

    /// The host is about to quit: put the dock back no matter what
    pub fn application_will_terminate(&mut self) {
        self.dock_conflict = None;
    }

    /// Another application quit
    pub fn application_did_terminate(&mut self, app: &AppHandle) {
        if self.previous_app.as_ref().is_some_and(|prev| prev.pid == app.pid) {
            log::debug!("Previous application {:?} terminated", app);
            self.previous_app = None;
        }
    }
}
