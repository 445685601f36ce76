//! Contracts with the host window system and terminal engine.
//!
//! The quick terminal core never talks to AppKit, a compositor or a PTY
//! directly. Everything it needs from the outside world goes through the
//! traits in this module, which lets the visibility state machine and tab
//! model run (and be tested) without a display server.
//!
//! - [`OverlayWindow`]: the single overlay window
//! - [`Desktop`]: foreground application, Spaces, screens and dock geometry
//! - [`DockControl`]: the global dock auto-hide preference
//! - [`TerminalSurface`] / [`SurfaceFactory`]: terminal surfaces owned by the engine

use crate::config::{QuickTerminalScreen, SpaceBehavior};
use crate::geometry::{Rect, ScreenInfo};
use crate::observer::Observable;
use crate::timer::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Identifier of an OS virtual desktop (macOS Space)
pub type SpaceId = u64;

/// Identifier of a native window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Identifier of a terminal surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// A running application other than (or including) the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppHandle {
    pub pid: i32,
    pub bundle_id: Option<String>,
}

impl AppHandle {
    pub fn new(pid: i32, bundle_id: impl Into<String>) -> Self {
        Self {
            pid,
            bundle_id: Some(bundle_id.into()),
        }
    }

    /// Same application bundle (falls back to pid when either has no bundle id)
    pub fn is_same_app(&self, other: &AppHandle) -> bool {
        match (&self.bundle_id, &other.bundle_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.pid == other.pid,
        }
    }
}

/// Window stacking level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLevel {
    Normal,
    /// Above normal windows, below menus and system overlays
    Floating,
    /// Above the menu bar and dock; only used while sliding
    PopUpMenu,
}

/// How the window participates in Spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionBehavior {
    /// Window stays on the Space it was ordered in
    MoveToActiveSpace,
    /// Window is visible on every Space
    CanJoinAllSpaces,
}

impl From<SpaceBehavior> for CollectionBehavior {
    fn from(behavior: SpaceBehavior) -> Self {
        match behavior {
            SpaceBehavior::Remain => CollectionBehavior::MoveToActiveSpace,
            SpaceBehavior::Move => CollectionBehavior::CanJoinAllSpaces,
        }
    }
}

/// Window background treatment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowAppearance {
    Opaque,
    /// Non-opaque window with background blur behind `opacity`
    Translucent { opacity: f64 },
}

/// Full screen flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenMode {
    /// OS-managed full screen on its own Space
    Native,
    /// Window resized to cover the screen in place
    NonNative,
}

/// The overlay window as exposed by the host window system.
pub trait OverlayWindow {
    fn id(&self) -> WindowId;

    fn frame(&self) -> Rect;

    /// Move the window immediately
    fn set_frame(&mut self, frame: Rect, alpha: f64);

    /// Start animating towards `frame`. Completion is tracked by the caller.
    fn animate_to(&mut self, frame: Rect, alpha: f64, duration: Duration);

    fn set_level(&mut self, level: WindowLevel);

    /// Bring to front and request key status
    fn make_key_and_order_front(&mut self);

    /// Remove from the window list entirely
    fn order_out(&mut self);

    /// Route keyboard input to `surface`
    fn make_first_responder(&mut self, surface: SurfaceId);

    fn is_key(&self) -> bool;

    fn is_visible(&self) -> bool;

    fn is_on_active_space(&self) -> bool;

    /// A modal sheet or alert is attached
    fn has_attached_sheet(&self) -> bool;

    fn is_fullscreen(&self) -> bool;

    fn exit_fullscreen(&mut self);

    fn toggle_fullscreen(&mut self, mode: FullscreenMode);

    /// Screen the window currently lives on
    fn screen(&self) -> Option<ScreenInfo>;

    fn set_collection_behavior(&mut self, behavior: CollectionBehavior);

    fn set_appearance(&mut self, appearance: WindowAppearance);
}

/// Process-wide desktop state.
pub trait Desktop {
    /// The host application is the foreground application
    fn is_host_active(&self) -> bool;

    fn host_application(&self) -> AppHandle;

    fn frontmost_application(&self) -> Option<AppHandle>;

    /// Force the host application to the foreground
    fn activate_host(&self);

    /// Returns false if the application refused activation
    fn activate_application(&self, app: &AppHandle) -> bool;

    fn is_terminated(&self, app: &AppHandle) -> bool;

    /// Identifier of the currently active Space
    fn active_space(&self) -> SpaceId;

    fn screen(&self, selector: QuickTerminalScreen) -> Option<ScreenInfo>;

    fn main_screen(&self) -> Option<ScreenInfo>;

    /// Region reserved by the dock on `screen`, if the dock is shown there
    fn dock_area(&self, screen: &ScreenInfo) -> Option<Rect>;
}

/// Global dock auto-hide preference.
pub trait DockControl {
    fn autohide_enabled(&self) -> bool;

    fn set_autohide_enabled(&self, enabled: bool);

    /// Ask the window server to auto-hide the dock while we are active
    fn acquire_autohide_presentation(&self);

    fn release_autohide_presentation(&self);
}

/// A terminal surface owned by the terminal engine.
pub trait TerminalSurface {
    fn id(&self) -> SurfaceId;

    /// Window the surface view is currently attached to
    fn window(&self) -> Option<WindowId>;

    /// Title reported by the running program
    fn title(&self) -> Observable<String>;

    /// Working directory reported by shell integration
    fn pwd(&self) -> Option<String>;

    /// The child process exited
    fn has_exited(&self) -> bool;
}

/// Shared reference to a surface; the engine owns the process and buffers
pub type SurfaceHandle = Arc<dyn TerminalSurface>;

/// Creates default terminal surfaces for new tabs.
pub trait SurfaceFactory {
    fn new_surface(&self) -> SurfaceHandle;
}

/// Everything the quick terminal needs from its host.
pub struct PlatformServices {
    pub desktop: Box<dyn Desktop>,
    pub dock: Arc<dyn DockControl>,
    pub surfaces: Box<dyn SurfaceFactory>,
    pub clock: Arc<dyn Clock>,
}
