// Library exports for the quick terminal overlay
//
// # Threading
//
// The core is single-threaded: every state transition runs on the host's UI
// thread and deferred work goes through the controller's timer queue.
// `parking_lot::Mutex` is only used for state shared with callbacks
// (observables, the debug logger, the config watcher).

/// Crate version, for hosts that report it in an about panel
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub use quick_term_config as config;

pub mod controller;
pub mod dock;
pub mod events;
pub mod geometry;
pub mod observer;
pub mod platform;
pub mod position;
pub mod quick_terminal;
pub mod tab;
pub mod timer;

pub use controller::{OverlayVisibilityController, VisibilityState};
pub use events::{EventBus, GotoTab, QuickTerminalEvent};
pub use quick_terminal::QuickTerminal;
pub use tab::{QuickTerminalTab, SurfaceDisplay, TabId, TabManager};
