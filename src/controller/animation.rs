//! Slide-in / slide-out sequencing and focus acquisition.

use super::{
    ATTACH_RETRY_DELAY, Deferred, FOCUS_RETRIES, FOCUS_RETRY_DELAY, OverlayVisibilityController,
    VisibilityState,
};
use crate::dock::DockSuppression;
use crate::geometry::ScreenInfo;
use crate::platform::WindowLevel;
use crate::position;
use std::time::Duration;

impl OverlayVisibilityController {
    /// Place the window past the anchor edge of `screen` and slide it to its
    /// resting frame.
    pub(super) fn animate_in(&mut self, screen: ScreenInfo) {
        let duration = self.derived_config.animation_duration;
        let dock_area = self.desktop.dock_area(&screen);
        let Some(window) = self.window.as_mut() else {
            return;
        };

        let size = window.frame().size;
        let start = position::initial_placement(self.position, size, &screen);
        window.set_frame(start.frame, start.alpha);

        // Above the menu bar and dock so the window can sit off-screen
        window.set_level(WindowLevel::PopUpMenu);

        let conflicts = position::conflicts_with_dock(self.position, size, &screen, dock_area);
        let target = position::final_placement(self.position, size, &screen);

        self.schedule_transition(Duration::ZERO, Deferred::OrderFront);

        if conflicts {
            let dock = &self.dock;
            self.dock_conflict
                .get_or_insert_with(|| DockSuppression::new(dock.clone()))
                .hide();
        } else {
            self.dock_conflict = None;
        }

        if let Some(window) = self.window.as_mut() {
            window.animate_to(target.frame, target.alpha, duration);
        }
        log::debug!(
            "Animating in to {:?} over {:?} (dock conflict: {})",
            target.frame,
            duration,
            conflicts
        );
        self.schedule_transition(duration, Deferred::AnimateInFinished);
    }

    /// One tick after the slide-in completed
    pub(super) fn animate_in_settled(&mut self) {
        if !self.state.is_visible() {
            self.dock_conflict = None;
            return;
        }
        self.state = VisibilityState::Visible;

        // Above normal windows but low enough for IME popups
        if let Some(window) = self.window.as_mut() {
            window.set_level(WindowLevel::Floating);
        }
        self.sync_appearance();
        self.make_window_key(0);

        // Activate the host only after our window is focused, otherwise the
        // OS brings one of the host's other windows forward instead.
        if !self.desktop.is_host_active() {
            self.desktop.activate_host();
            self.schedule_transition(Duration::ZERO, Deferred::ActivationCheck);
        }
        log::info!("Quick terminal visible");
    }

    pub(super) fn activation_check(&mut self) {
        let is_key = self.window.as_ref().is_some_and(|w| w.is_key());
        if !is_key {
            log::debug!("Quick terminal not key after activation; retrying");
            self.make_window_key(FOCUS_RETRIES);
        }
    }

    /// Order the window front and focus the focused surface, retrying every
    /// [`FOCUS_RETRY_DELAY`] up to `retries` more times until the window is
    /// key.
    pub(super) fn make_window_key(&mut self, retries: u8) {
        if !self.state.is_visible() {
            return;
        }
        let Some(surface) = self.focused_surface.clone() else {
            return;
        };
        let Some(window) = self.window.as_mut() else {
            return;
        };
        // Focusing a surface that lives in another window does nothing
        if surface.window() != Some(window.id()) {
            return;
        }

        window.make_key_and_order_front();
        window.make_first_responder(surface.id());

        if window.is_key() {
            return;
        }
        if retries == 0 {
            log::debug!("Quick terminal window did not become key");
            return;
        }
        self.schedule_transition(
            FOCUS_RETRY_DELAY,
            Deferred::MakeKey {
                retries: retries - 1,
            },
        );
    }

    /// Wait for the focused surface to be attached to the overlay window,
    /// then focus it.
    pub(super) fn attach_focused_surface(&mut self, retries: u8) {
        let Some(surface) = self.focused_surface.clone() else {
            return;
        };
        let Some(window_id) = self.window.as_ref().map(|w| w.id()) else {
            log::debug!("No quick terminal window yet; surface {:?} waits", surface.id());
            return;
        };

        if surface.window() == Some(window_id) {
            self.make_window_key(FOCUS_RETRIES);
            return;
        }
        if retries == 0 {
            log::debug!(
                "Surface {:?} never attached to the quick terminal window; giving up",
                surface.id()
            );
            return;
        }
        let token = self.schedule(
            ATTACH_RETRY_DELAY,
            Deferred::AttachSurface {
                retries: retries - 1,
            },
        );
        self.attach_timer = Some(token);
    }

    /// Restore focus to the previous application and slide the window out.
    pub(super) fn animate_out(&mut self) {
        // The dock comes back on every path, including the off-space one
        self.dock_conflict = None;

        let duration = self.derived_config.animation_duration;
        let fallback_screen = self.desktop.main_screen();
        let Some(window) = self.window.as_mut() else {
            return;
        };

        if window.is_fullscreen() {
            window.exit_fullscreen();
        }

        // Animating a window on another Space would only glitch
        let screen = window.screen().or(fallback_screen);
        let Some(screen) = screen.filter(|_| window.is_on_active_space()) else {
            log::debug!("Quick terminal not on the active space; hiding immediately");
            self.previous_app = None;
            window.order_out();
            self.state = VisibilityState::Hidden;
            return;
        };

        // Reactivate the previous app before sliding out so the OS brings
        // the right window forward once ours is gone.
        if let Some(app) = self.previous_app.take() {
            if self.desktop.is_terminated(&app) {
                log::debug!("Previous application {:?} terminated; not restoring", app);
            } else if !self.desktop.activate_application(&app) {
                log::debug!("Previous application {:?} refused activation", app);
            }
        }

        let Some(window) = self.window.as_mut() else {
            return;
        };
        window.set_level(WindowLevel::PopUpMenu);
        let size = window.frame().size;
        let target = position::initial_placement(self.position, size, &screen);
        window.animate_to(target.frame, target.alpha, duration);
        log::debug!("Animating out to {:?} over {:?}", target.frame, duration);

        self.schedule_transition(duration, Deferred::AnimateOutFinished);
    }

    pub(super) fn animate_out_finished(&mut self) {
        if self.state != VisibilityState::HidingAnimating {
            return;
        }
        // Removes the window from the window list; the OS picks the next key
        if let Some(window) = self.window.as_mut() {
            window.order_out();
        }
        self.state = VisibilityState::Hidden;
        log::info!("Quick terminal hidden");
    }
}
