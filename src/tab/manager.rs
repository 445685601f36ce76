//! Tab manager for the ordered tabs of the quick terminal

use super::{QuickTerminalTab, SurfaceDisplay, TabId};
use crate::platform::{SurfaceFactory, SurfaceId};

/// Manages the ordered tabs hosted by the overlay.
///
/// Whenever the collection is non-empty exactly one tab is active. Closing the
/// last tab immediately creates a fresh one, so the overlay never shows an
/// empty content area.
pub struct TabManager {
    /// All tabs, in display order
    tabs: Vec<QuickTerminalTab>,
    /// Currently active tab ID
    active_tab_id: Option<TabId>,
    /// Tab being dragged in the tab bar
    dragging: Option<TabId>,
    surfaces: Box<dyn SurfaceFactory>,
}

impl TabManager {
    /// Create an empty tab manager that builds new tabs from `surfaces`
    pub fn new(surfaces: Box<dyn SurfaceFactory>) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            dragging: None,
            surfaces,
        }
    }

    /// Create a tab around a fresh default surface, append it and select it
    pub fn new_tab(&mut self, display: &mut dyn SurfaceDisplay) -> TabId {
        let tab = QuickTerminalTab::new(self.surfaces.new_surface());
        let id = tab.id;
        self.tabs.push(tab);
        log::info!("Created new tab {} (total: {})", id, self.tabs.len());
        self.select_tab(id, display);
        id
    }

    /// Make `id` the active tab and ask `display` to show its surface.
    /// Returns false if the tab is unknown or already active.
    pub fn select_tab(&mut self, id: TabId, display: &mut dyn SurfaceDisplay) -> bool {
        if self.active_tab_id == Some(id) {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };

        for tab in &mut self.tabs {
            tab.set_active(false);
        }
        let tab = &mut self.tabs[idx];
        tab.set_active(true);
        self.active_tab_id = Some(id);
        log::debug!("Selected tab {} (index {})", id, idx);

        display.update_surface_tree(tab.surface().clone());
        true
    }

    /// Close a tab by ID. Returns false if the tab is unknown.
    ///
    /// Closing the active tab selects the tab now at its index (or the new
    /// last tab); closing the only tab creates a replacement.
    pub fn close_tab(&mut self, id: TabId, display: &mut dyn SurfaceDisplay) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };

        log::info!("Closing tab {} (index {})", id, idx);
        // Dropping the tab releases its title subscription
        drop(self.tabs.remove(idx));
        if self.dragging == Some(id) {
            self.dragging = None;
        }

        if self.active_tab_id == Some(id) {
            self.active_tab_id = None;
            if self.tabs.is_empty() {
                self.new_tab(display);
            } else {
                let new_idx = idx.min(self.tabs.len() - 1);
                let next_id = self.tabs[new_idx].id;
                self.select_tab(next_id, display);
            }
        }
        true
    }

    /// Close every tab whose surface process has exited. Returns how many
    /// were closed.
    pub fn close_exited_tabs(&mut self, display: &mut dyn SurfaceDisplay) -> usize {
        let exited: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|t| t.has_exited())
            .map(|t| t.id)
            .collect();

        for id in &exited {
            log::info!("Cleaning up exited tab {}", id);
            self.close_tab(*id, display);
        }
        exited.len()
    }

    /// Move the tab at `from` so that it ends up at index `to`.
    /// Returns false when either index is out of range or they are equal.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        let len = self.tabs.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let tab = self.tabs.remove(from);
        log::debug!("Moved tab {} from index {} to {}", tab.id, from, to);
        self.tabs.insert(to, tab);
        true
    }

    /// Start dragging a tab in the tab bar
    pub fn begin_drag(&mut self, id: TabId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.dragging = Some(id);
        true
    }

    /// The drag moved over `target`: the dragged tab takes the target's
    /// index. Called on every drag-over, so repeated calls are expected.
    pub fn drag_entered(&mut self, target: TabId) -> bool {
        let Some(dragged) = self.dragging else {
            return false;
        };
        if dragged == target {
            return false;
        }
        match (self.index_of(dragged), self.index_of(target)) {
            (Some(from), Some(to)) => self.move_tab(from, to),
            _ => false,
        }
    }

    /// Finish (or cancel) the current drag
    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Currently dragged tab
    pub fn dragging(&self) -> Option<TabId> {
        self.dragging
    }

    /// Move the active tab by `amount` positions, clamped to the ends of the
    /// collection. Never wraps.
    pub fn move_by_offset(&mut self, amount: isize) -> bool {
        let Some(from) = self.active_tab_index() else {
            return false;
        };
        let last = self.tabs.len() - 1;
        let to = if amount < 0 {
            from.saturating_sub(amount.unsigned_abs())
        } else {
            from.saturating_add(amount.unsigned_abs()).min(last)
        };
        if to == from {
            return false;
        }
        self.move_tab(from, to)
    }

    /// Select the next tab (wraps around)
    pub fn select_next(&mut self, display: &mut dyn SurfaceDisplay) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current = self.active_tab_index().unwrap_or(0);
        let next_id = self.tabs[(current + 1) % self.tabs.len()].id;
        self.select_tab(next_id, display);
    }

    /// Select the previous tab (wraps around)
    pub fn select_previous(&mut self, display: &mut dyn SurfaceDisplay) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current = self.active_tab_index().unwrap_or(0);
        let prev_idx = if current == 0 {
            self.tabs.len() - 1
        } else {
            current - 1
        };
        let prev_id = self.tabs[prev_idx].id;
        self.select_tab(prev_id, display);
    }

    /// Select the last tab
    pub fn select_last(&mut self, display: &mut dyn SurfaceDisplay) {
        if let Some(last) = self.tabs.last() {
            let id = last.id;
            self.select_tab(id, display);
        }
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> Option<&QuickTerminalTab> {
        self.active_tab_id.and_then(|id| self.get_tab(id))
    }

    /// Get the active tab ID
    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Get index of active tab (0-based)
    pub fn active_tab_index(&self) -> Option<usize> {
        self.active_tab_id.and_then(|id| self.index_of(id))
    }

    /// Get a tab by ID
    pub fn get_tab(&self, id: TabId) -> Option<&QuickTerminalTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Tab hosting `surface`
    pub fn tab_for_surface(&self, surface: SurfaceId) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| t.surface().id() == surface)
            .map(|t| t.id)
    }

    /// Get all tabs in display order
    pub fn tabs(&self) -> &[QuickTerminalTab] {
        &self.tabs
    }

    /// Tab IDs in display order
    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }

    /// Get the number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

impl std::fmt::Debug for TabManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabManager")
            .field("tabs", &self.tabs)
            .field("active_tab_id", &self.active_tab_id)
            .field("dragging", &self.dragging)
            .finish()
    }
}
