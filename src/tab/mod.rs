//! Tabs hosted by the quick terminal overlay.
//!
//! A [`QuickTerminalTab`] wraps a shared handle to a terminal surface owned by
//! the terminal engine and mirrors the surface's title. [`TabManager`] keeps
//! the ordered collection and its selection.

mod manager;

pub use manager::TabManager;

use crate::observer::{Observable, Subscription};
use crate::platform::SurfaceHandle;
use uuid::Uuid;

/// Title used when a surface reports neither a title nor a working directory
pub const DEFAULT_TITLE: &str = "Terminal";

/// Unique identifier for a tab, stable for the tab's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receives requests to make a surface the visible content of the overlay.
///
/// Implemented by the visibility controller. Requests must be idempotent and
/// are allowed before the surface is attached to the overlay window.
pub trait SurfaceDisplay {
    fn update_surface_tree(&mut self, surface: SurfaceHandle);
}

/// A single tab in the quick terminal
pub struct QuickTerminalTab {
    /// Unique identifier
    pub id: TabId,
    surface: SurfaceHandle,
    title: Observable<String>,
    is_active: bool,
    _title_subscription: Subscription,
}

impl QuickTerminalTab {
    /// Wrap `surface` in a new, inactive tab.
    ///
    /// The title starts as the surface's current title, falling back to its
    /// working directory and then to [`DEFAULT_TITLE`], and follows every
    /// later title change the surface reports.
    pub fn new(surface: SurfaceHandle) -> Self {
        let surface_title = surface.title();
        let initial = Some(surface_title.get())
            .filter(|t| !t.is_empty())
            .or_else(|| surface.pwd().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let title = Observable::new(initial);
        let sink = title.clone();
        let subscription = surface_title.subscribe(move |t: &String| sink.set(t.clone()));

        Self {
            id: TabId::new(),
            surface,
            title,
            is_active: false,
            _title_subscription: subscription,
        }
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    /// Current title
    pub fn title(&self) -> String {
        self.title.get()
    }

    /// Observable title, for tab bar bindings
    pub fn title_observable(&self) -> &Observable<String> {
        &self.title
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// The surface's child process has exited
    pub fn has_exited(&self) -> bool {
        self.surface.has_exited()
    }
}

impl std::fmt::Debug for QuickTerminalTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickTerminalTab")
            .field("id", &self.id)
            .field("surface", &self.surface.id())
            .field("title", &self.title.get())
            .field("is_active", &self.is_active)
            .finish()
    }
}
