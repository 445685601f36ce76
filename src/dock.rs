//! Temporary dock auto-hide while the overlay covers the dock.

use crate::platform::DockControl;
use std::sync::Arc;

/// Owns a suppressed dock.
///
/// Captures the user's auto-hide preference on creation. While hidden, the
/// dock is forced to auto-hide; [`restore`](Self::restore) (or dropping the
/// value) puts the captured preference back exactly.
pub struct DockSuppression {
    dock: Arc<dyn DockControl>,
    previous_autohide: bool,
    hidden: bool,
}

impl DockSuppression {
    pub fn new(dock: Arc<dyn DockControl>) -> Self {
        let previous_autohide = dock.autohide_enabled();
        Self {
            dock,
            previous_autohide,
            hidden: false,
        }
    }

    pub fn hide(&mut self) {
        if self.hidden {
            return;
        }
        self.dock.acquire_autohide_presentation();
        self.dock.set_autohide_enabled(true);
        self.hidden = true;
        log::debug!(
            "Dock hidden (previous autohide: {})",
            self.previous_autohide
        );
    }

    pub fn restore(&mut self) {
        if !self.hidden {
            return;
        }
        self.dock.release_autohide_presentation();
        self.dock.set_autohide_enabled(self.previous_autohide);
        self.hidden = false;
        log::debug!("Dock restored (autohide: {})", self.previous_autohide);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn previous_autohide(&self) -> bool {
        self.previous_autohide
    }
}

impl std::fmt::Debug for DockSuppression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockSuppression")
            .field("previous_autohide", &self.previous_autohide)
            .field("hidden", &self.hidden)
            .finish()
    }
}

impl Drop for DockSuppression {
    fn drop(&mut self) {
        self.restore();
    }
}
