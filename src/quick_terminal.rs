//! The quick terminal: overlay controller plus its tabs, driven by events.
//!
//! [`QuickTerminal`] is what the host application holds. It owns the
//! [`OverlayVisibilityController`] and the [`TabManager`], drains the
//! [`EventBus`] and fires deferred continuations from [`QuickTerminal::tick`],
//! which the host calls once per event loop iteration.

use crate::config::{Config, ConfigWatcher};
use crate::controller::OverlayVisibilityController;
use crate::events::{EventBus, GotoTab, QuickTerminalEvent};
use crate::platform::{OverlayWindow, PlatformServices, SurfaceId};
use crate::tab::{TabId, TabManager};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

/// Drop-down terminal overlay with its tabs
pub struct QuickTerminal {
    controller: OverlayVisibilityController,
    tabs: TabManager,
    config: Config,
    bus: EventBus,
    events: Receiver<QuickTerminalEvent>,
    config_watcher: Option<ConfigWatcher>,
    config_path: Option<PathBuf>,
}

impl QuickTerminal {
    pub fn new(config: Config, services: PlatformServices) -> Self {
        let PlatformServices {
            desktop,
            dock,
            surfaces,
            clock,
        } = services;
        let controller = OverlayVisibilityController::new(&config, desktop, dock, clock);
        let (bus, events) = EventBus::channel();
        Self {
            controller,
            tabs: TabManager::new(surfaces),
            config,
            bus,
            events,
            config_watcher: None,
            config_path: None,
        }
    }

    /// Handle for publishing events to this quick terminal
    pub fn event_bus(&self) -> EventBus {
        self.bus.clone()
    }

    /// The host built the overlay window: create the first tab and slide in.
    pub fn window_did_load(&mut self, window: Box<dyn OverlayWindow>) {
        self.controller.window_did_load(window);
        self.ensure_tab();
        self.controller.show();
    }

    /// Show or hide the overlay. Showing with no tabs creates one.
    pub fn toggle(&mut self) {
        self.controller.toggle();
        if self.controller.is_visible() {
            self.ensure_tab();
        }
    }

    fn ensure_tab(&mut self) {
        if self.tabs.is_empty() {
            self.tabs.new_tab(&mut self.controller);
        }
    }

    /// Route one event to its handler
    pub fn handle_event(&mut self, event: QuickTerminalEvent) {
        log::debug!("Quick terminal event: {:?}", event);
        match event {
            QuickTerminalEvent::Toggle => self.toggle(),
            QuickTerminalEvent::NewTab => {
                self.new_tab();
            }
            QuickTerminalEvent::CloseTab(id) => {
                self.close_tab(id);
            }
            QuickTerminalEvent::MoveTab { surface, amount } => {
                if self.controller.is_focused_surface(surface) {
                    self.tabs.move_by_offset(amount);
                }
            }
            QuickTerminalEvent::GotoTab { surface, target } => {
                if self.controller.is_focused_surface(surface) {
                    self.goto_tab(target);
                }
            }
            QuickTerminalEvent::ToggleFullscreen { surface } => {
                self.controller.toggle_fullscreen(surface);
            }
            QuickTerminalEvent::FocusLost => self.controller.window_did_resign_key(),
            QuickTerminalEvent::FocusGained => self.controller.window_did_become_key(),
            QuickTerminalEvent::ConfigChanged(config) => self.apply_config(config),
            QuickTerminalEvent::ApplicationWillTerminate => {
                self.controller.application_will_terminate();
            }
            QuickTerminalEvent::ApplicationTerminated(app) => {
                self.controller.application_did_terminate(&app);
            }
            QuickTerminalEvent::SurfaceExited(surface) => self.surface_exited(surface),
        }
    }

    /// Handle every queued event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                // The bus keeps a sender alive, so this never disconnects
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// One event loop iteration: queued events, config reloads, then due
    /// continuations.
    pub fn tick(&mut self) {
        self.pump();
        self.poll_config_watcher();
        self.controller.run_due_timers();
    }

    /// When the host should call [`tick`](Self::tick) again at the latest
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_timer_due()
    }

    /// Watch `path` and reload the configuration whenever it changes
    pub fn watch_config(&mut self, path: &Path) -> Result<()> {
        let watcher = ConfigWatcher::new(path, self.config.config_watch_debounce_ms)
            .with_context(|| format!("Failed to watch {}", path.display()))?;
        self.config_watcher = Some(watcher);
        self.config_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Reload the configuration if the watcher reported a change. A config
    /// that fails to load is logged and the current one is kept.
    pub fn poll_config_watcher(&mut self) -> bool {
        let Some(watcher) = &self.config_watcher else {
            return false;
        };
        let Some(event) = watcher.try_recv() else {
            return false;
        };

        let path = self.config_path.clone().unwrap_or(event.path);
        log::info!("Config file changed, reloading {:?}", path);
        match self.reload_config(&path) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Keeping previous quick terminal config: {:#}", e);
                false
            }
        }
    }

    /// Load `path` and apply it
    pub fn reload_config(&mut self, path: &Path) -> Result<()> {
        let config = Config::load_from_path(path)
            .with_context(|| format!("Failed to reload config from {}", path.display()))?;
        self.apply_config(config);
        Ok(())
    }

    fn apply_config(&mut self, config: Config) {
        self.controller.config_did_change(&config);
        self.config = config;
    }

    pub fn new_tab(&mut self) -> TabId {
        self.tabs.new_tab(&mut self.controller)
    }

    pub fn select_tab(&mut self, id: TabId) -> bool {
        self.tabs.select_tab(id, &mut self.controller)
    }

    pub fn close_tab(&mut self, id: TabId) -> bool {
        self.tabs.close_tab(id, &mut self.controller)
    }

    fn goto_tab(&mut self, target: GotoTab) {
        match target {
            GotoTab::Previous => self.tabs.select_previous(&mut self.controller),
            GotoTab::Next => self.tabs.select_next(&mut self.controller),
            GotoTab::Last => self.tabs.select_last(&mut self.controller),
        }
    }

    fn surface_exited(&mut self, surface: SurfaceId) {
        if let Some(id) = self.tabs.tab_for_surface(surface) {
            self.tabs.close_tab(id, &mut self.controller);
        }
        self.tabs.close_exited_tabs(&mut self.controller);
    }

    pub fn controller(&self) -> &OverlayVisibilityController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut OverlayVisibilityController {
        &mut self.controller
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    /// Tab manager access for drag gestures and reordering, which never
    /// change the displayed surface
    pub fn tabs_mut(&mut self) -> &mut TabManager {
        &mut self.tabs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for QuickTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickTerminal")
            .field("controller", &self.controller)
            .field("tabs", &self.tabs)
            .field("watching", &self.config_path)
            .finish()
    }
}
