//! Show/hide lifecycle of the quick terminal overlay window.
//!
//! [`OverlayVisibilityController`] owns the overlay window, the dock
//! suppression handle and the focus bookkeeping needed to hand control back to
//! whatever application was in front before the overlay appeared.
//!
//! The controller is single-threaded. Work that must happen later (animation
//! completion, next-tick continuations, focus and attachment retries) is
//! scheduled as [`Deferred`] entries in a [`TimerQueue`] and executed by
//! [`OverlayVisibilityController::run_due_timers`], which the host calls from
//! its event loop. Every show or hide cancels the pending transition entries
//! of the previous one, and every continuation re-checks visibility before it
//! acts.
//!
//! Submodules:
//! - `animation`: slide in/out sequencing and focus acquisition
//! - `focus`: key window changes, termination and configuration signals
//! - `derived_config`: the settings snapshot the controller runs on

mod animation;
mod derived_config;
mod focus;

pub use derived_config::DerivedConfig;

use crate::config::{Config, QuickTerminalPosition};
use crate::dock::DockSuppression;
use crate::geometry::Size;
use crate::observer::Observable;
use crate::platform::{
    AppHandle, Desktop, DockControl, FullscreenMode, OverlayWindow, SpaceId, SurfaceHandle,
    SurfaceId, WindowAppearance,
};
use crate::position;
use crate::tab::SurfaceDisplay;
use crate::timer::{Clock, TimerQueue, TimerToken};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Extra attempts at making the window key after the first one
pub const FOCUS_RETRIES: u8 = 10;

/// Delay between attempts at making the window key
pub const FOCUS_RETRY_DELAY: Duration = Duration::from_millis(25);

/// Extra checks for a surface to become attached to the overlay window
pub const ATTACH_RETRIES: u8 = 40;

/// Delay between surface attachment checks
pub const ATTACH_RETRY_DELAY: Duration = Duration::from_millis(25);

/// Lifecycle state of the overlay window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    ShowingAnimating,
    Visible,
    HidingAnimating,
}

impl VisibilityState {
    /// The overlay is logically shown (including while sliding in)
    pub fn is_visible(self) -> bool {
        matches!(
            self,
            VisibilityState::ShowingAnimating | VisibilityState::Visible
        )
    }
}

/// Continuations scheduled on the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deferred {
    /// Bring the window front one tick after it was positioned off-screen
    OrderFront,
    /// Slide-in animation finished
    AnimateInFinished,
    /// One tick after the slide-in finished
    AnimateInSettled,
    /// One tick after activating the host: retry focus if still not key
    ActivationCheck,
    MakeKey { retries: u8 },
    /// Slide-out animation finished
    AnimateOutFinished,
    /// Bring the window back after a Space switch
    ReRaise,
    AttachSurface { retries: u8 },
}

/// Controller for the quick terminal overlay window.
pub struct OverlayVisibilityController {
    /// Anchor position; fixed for the lifetime of the controller
    position: QuickTerminalPosition,
    derived_config: DerivedConfig,

    window: Option<Box<dyn OverlayWindow>>,
    desktop: Box<dyn Desktop>,
    dock: Arc<dyn DockControl>,
    clock: Arc<dyn Clock>,

    state: VisibilityState,
    visibility: Observable<bool>,

    /// Application that was in front when the overlay was shown. Never the
    /// host application.
    previous_app: Option<AppHandle>,
    /// Space that was active when the overlay was last shown
    previous_space: SpaceId,
    /// Present only while the overlay's frame overlaps the dock
    dock_conflict: Option<DockSuppression>,

    /// Surface that should receive keyboard focus
    focused_surface: Option<SurfaceHandle>,

    timers: TimerQueue<Deferred>,
    /// Pending entries belonging to the current show or hide
    transition_timers: Vec<TimerToken>,
    /// Pending surface attachment check
    attach_timer: Option<TimerToken>,
}

impl OverlayVisibilityController {
    pub fn new(
        config: &Config,
        desktop: Box<dyn Desktop>,
        dock: Arc<dyn DockControl>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            position: config.quick_terminal_position,
            derived_config: DerivedConfig::new(config),
            window: None,
            desktop,
            dock,
            clock,
            state: VisibilityState::Hidden,
            visibility: Observable::new(false),
            previous_app: None,
            previous_space: 0,
            dock_conflict: None,
            focused_surface: None,
            timers: TimerQueue::new(),
            transition_timers: Vec::new(),
            attach_timer: None,
        }
    }

    /// Take ownership of the overlay window once the host has built it.
    ///
    /// Applies the configured appearance and places the window at its loaded
    /// frame for the anchor position. The window is not shown. A display
    /// request made before the window existed resumes waiting for its surface
    /// to attach.
    pub fn window_did_load(&mut self, window: Box<dyn OverlayWindow>) {
        log::info!(
            "Quick terminal window {:?} loaded (position: {})",
            window.id(),
            self.position.display_name()
        );
        self.window = Some(window);
        self.sync_appearance();

        match self.window_screen() {
            Some(screen) => {
                let size = position::loaded_size(
                    self.position,
                    self.derived_config.size_fraction,
                    &screen,
                );
                let frame = position::final_frame(self.position, size, &screen);
                if let Some(window) = self.window.as_mut() {
                    window.set_frame(frame, 1.0);
                }
            }
            None => log::warn!("No screen available for the quick terminal window"),
        }

        if self.focused_surface.is_some() {
            if let Some(token) = self.attach_timer.take() {
                self.timers.cancel(token);
            }
            self.attach_focused_surface(ATTACH_RETRIES);
        }
    }

    /// Show when hidden or hiding; hide when shown or showing
    pub fn toggle(&mut self) {
        if self.state.is_visible() {
            self.hide();
        } else {
            self.show();
        }
    }

    /// Slide the overlay in. No-op without a window or when already visible.
    pub fn show(&mut self) {
        if self.window.is_none() || self.state.is_visible() {
            return;
        }
        let Some(screen) = self.target_screen() else {
            log::warn!(
                "No screen for quick terminal ({:?}); not showing",
                self.derived_config.screen
            );
            return;
        };

        if !self.desktop.is_host_active()
            && let Some(front) = self.desktop.frontmost_application()
            && !front.is_same_app(&self.desktop.host_application())
        {
            log::debug!("Remembering previous application {:?}", front);
            self.previous_app = Some(front);
        }
        self.previous_space = self.desktop.active_space();

        self.cancel_transition_timers();
        self.state = VisibilityState::ShowingAnimating;
        log::info!("Quick terminal showing (space {})", self.previous_space);
        self.visibility.set(true);

        self.animate_in(screen);
    }

    /// Slide the overlay out. No-op without a window or when not visible.
    pub fn hide(&mut self) {
        if self.window.is_none() || !self.state.is_visible() {
            return;
        }

        self.cancel_transition_timers();
        self.state = VisibilityState::HidingAnimating;
        log::info!("Quick terminal hiding");
        self.visibility.set(false);

        self.animate_out();
    }

    /// Clamp a user resize to what the anchor position allows
    pub fn window_will_resize(&self, requested: Size) -> Size {
        match self.window_screen() {
            Some(screen) => position::restrict_frame_size(requested, &screen, self.position),
            None => requested,
        }
    }

    /// Toggle non-native full screen when `surface` is the focused surface.
    /// Returns true if the window was toggled.
    pub fn toggle_fullscreen(&mut self, surface: SurfaceId) -> bool {
        if !self.is_focused_surface(surface) {
            return false;
        }
        let Some(window) = self.window.as_mut() else {
            return false;
        };
        window.toggle_fullscreen(FullscreenMode::NonNative);
        true
    }

    /// Fire every deferred continuation that is due. Continuations scheduled
    /// while firing run on the next call. Returns how many fired.
    pub fn run_due_timers(&mut self) -> usize {
        let horizon = self.timers.horizon();
        let mut fired = 0;
        while let Some((token, deferred)) = self.timers.pop_due(self.clock.now(), horizon) {
            self.transition_timers.retain(|t| *t != token);
            if self.attach_timer == Some(token) {
                self.attach_timer = None;
            }
            log::trace!("Running deferred {:?}", deferred);
            self.run_deferred(deferred);
            fired += 1;
        }
        fired
    }

    /// When the next deferred continuation becomes due
    pub fn next_timer_due(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    /// Number of pending deferred continuations
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Observable visibility flag; changes before any animation starts
    pub fn visibility(&self) -> Observable<bool> {
        self.visibility.clone()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn position(&self) -> QuickTerminalPosition {
        self.position
    }

    pub fn derived_config(&self) -> &DerivedConfig {
        &self.derived_config
    }

    pub fn previous_app(&self) -> Option<&AppHandle> {
        self.previous_app.as_ref()
    }

    pub fn previous_space(&self) -> SpaceId {
        self.previous_space
    }

    /// A dock suppression handle is held (the overlay overlaps the dock)
    pub fn has_dock_conflict(&self) -> bool {
        self.dock_conflict.is_some()
    }

    /// The dock is currently forced to auto-hide
    pub fn is_dock_suppressed(&self) -> bool {
        self.dock_conflict.as_ref().is_some_and(|d| d.is_hidden())
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn focused_surface(&self) -> Option<&SurfaceHandle> {
        self.focused_surface.as_ref()
    }

    pub fn is_focused_surface(&self, surface: SurfaceId) -> bool {
        self.focused_surface
            .as_ref()
            .is_some_and(|s| s.id() == surface)
    }

    fn run_deferred(&mut self, deferred: Deferred) {
        match deferred {
            Deferred::OrderFront => {
                if self.state.is_visible()
                    && let Some(window) = self.window.as_mut()
                {
                    window.make_key_and_order_front();
                }
            }
            Deferred::AnimateInFinished => {
                self.schedule_transition(Duration::ZERO, Deferred::AnimateInSettled);
            }
            Deferred::AnimateInSettled => self.animate_in_settled(),
            Deferred::ActivationCheck => self.activation_check(),
            Deferred::MakeKey { retries } => self.make_window_key(retries),
            Deferred::AnimateOutFinished => self.animate_out_finished(),
            Deferred::ReRaise => {
                if self.state.is_visible()
                    && let Some(window) = self.window.as_mut()
                {
                    window.make_key_and_order_front();
                }
            }
            Deferred::AttachSurface { retries } => self.attach_focused_surface(retries),
        }
    }

    fn schedule(&mut self, delay: Duration, deferred: Deferred) -> TimerToken {
        self.timers.schedule(self.clock.now(), delay, deferred)
    }

    /// Schedule a continuation that the next show or hide cancels
    fn schedule_transition(&mut self, delay: Duration, deferred: Deferred) {
        let token = self.schedule(delay, deferred);
        self.transition_timers.push(token);
    }

    fn cancel_transition_timers(&mut self) {
        for token in std::mem::take(&mut self.transition_timers) {
            self.timers.cancel(token);
        }
    }

    /// Screen configured for showing, falling back to the main screen
    fn target_screen(&self) -> Option<crate::geometry::ScreenInfo> {
        self.desktop
            .screen(self.derived_config.screen)
            .or_else(|| self.desktop.main_screen())
    }

    /// Screen the window is on, falling back to the main screen
    fn window_screen(&self) -> Option<crate::geometry::ScreenInfo> {
        self.window
            .as_ref()
            .and_then(|w| w.screen())
            .or_else(|| self.desktop.main_screen())
    }

    /// Re-apply Spaces behavior and background treatment
    fn sync_appearance(&mut self) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        window.set_collection_behavior(self.derived_config.space_behavior.into());

        // Blur and opacity only take effect on a visible window
        if !window.is_visible() {
            return;
        }
        let appearance = if self.derived_config.is_translucent() {
            WindowAppearance::Translucent {
                opacity: self.derived_config.background_opacity,
            }
        } else {
            WindowAppearance::Opaque
        };
        window.set_appearance(appearance);
    }
}

impl SurfaceDisplay for OverlayVisibilityController {
    /// Make `surface` the focused surface and move keyboard focus to it once
    /// it is attached to the overlay window. Supersedes any earlier request.
    fn update_surface_tree(&mut self, surface: SurfaceHandle) {
        log::debug!("Displaying surface {:?}", surface.id());
        self.focused_surface = Some(surface);
        if let Some(token) = self.attach_timer.take() {
            self.timers.cancel(token);
        }
        self.attach_focused_surface(ATTACH_RETRIES);
    }
}

impl std::fmt::Debug for OverlayVisibilityController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayVisibilityController")
            .field("position", &self.position)
            .field("state", &self.state)
            .field("previous_app", &self.previous_app)
            .field("previous_space", &self.previous_space)
            .field("dock_conflict", &self.dock_conflict)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}
