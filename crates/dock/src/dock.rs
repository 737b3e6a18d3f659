//! Dock engine facade
//!
//! Ties the state to its collaborators: the window source for snapshots and
//! commands, the pinned store for write-back, and the launcher. This is the
//! surface a presentation layer talks to.
//!
//! All collaborator failures stop here. A failed snapshot skips the cycle, a
//! failed save is logged, and the in-memory state stays authoritative.

use serde::Serialize;

use crate::config::{Config, DisplayMode};
use crate::error::DockError;
use crate::event::WindowEvent;
use crate::launch::Launcher;
use crate::pinned::PinnedStore;
use crate::state::DockState;
use crate::task::{AppKey, Task};
use crate::window_source::WindowSource;

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockView {
    /// Buttons shown directly, in display order
    pub visible: Vec<Task>,
    /// Overflow-mode tasks behind the "more" list (empty in paged mode)
    pub hidden: Vec<Task>,
    /// Current page (always 0 in overflow mode)
    pub page: usize,
    pub page_count: usize,
    /// Whether page up/down controls should be shown
    pub paging_active: bool,
}

/// What `activate` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Focus command sent to a running app
    Focused,
    /// New process started
    Launched,
    /// A previous launch is still starting up
    AlreadyLaunching,
}

/// The dock engine
pub struct Dock {
    state: DockState,
    source: Box<dyn WindowSource>,
    store: Box<dyn PinnedStore>,
    launcher: Launcher,
    config: Config,
    current_page: usize,
}

impl Dock {
    /// Create an engine. No I/O happens until [`Dock::start`].
    pub fn new(config: Config, source: Box<dyn WindowSource>, store: Box<dyn PinnedStore>) -> Self {
        Self {
            state: DockState::from_config(&config),
            source,
            store,
            launcher: Launcher::new(),
            config,
            current_page: 0,
        }
    }

    /// Load the pinned list and take the first snapshot.
    pub fn start(&mut self) {
        self.load_pinned();
        self.poll_snapshot();
        tracing::info!(tasks = self.state.len(), pinned = self.state.pinned_count(), "dock started");
    }

    /// Install the pinned list from the store.
    ///
    /// If the store can't be read, the pinned list from the loaded config is
    /// used instead.
    pub fn load_pinned(&mut self) {
        let entries = match self.store.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load pinned apps, using config copy");
                self.config.pinned_apps.clone()
            }
        };
        self.state.load_pinned(entries);
        self.after_change();
    }

    pub fn state(&self) -> &DockState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Query the window source and reconcile. Returns whether anything changed.
    ///
    /// A failed query leaves the state untouched.
    pub fn poll_snapshot(&mut self) -> bool {
        match self.try_snapshot() {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot failed, skipping cycle");
                false
            }
        }
    }

    /// Like [`Dock::poll_snapshot`], but reports a failed query.
    ///
    /// # Errors
    ///
    /// Whatever the window source returned; the state is unchanged.
    pub fn try_snapshot(&mut self) -> Result<bool, DockError> {
        self.launcher.reap();
        let windows = self.source.snapshot()?;
        let changed = self.state.apply_snapshot(&windows);
        self.after_change();
        if changed {
            tracing::debug!(tasks = self.state.len(), windows = windows.len(), "snapshot applied");
        }
        Ok(changed)
    }

    /// Apply a batch of events from the event channel.
    ///
    /// A batch containing a close is followed by a snapshot, since only a
    /// full listing can tell whether the class still has windows.
    pub fn apply_events(&mut self, events: &[WindowEvent]) -> bool {
        let mut changed = false;
        let mut needs_snapshot = false;
        for event in events {
            changed |= self.state.apply_event(event);
            needs_snapshot |= event.needs_snapshot();
        }
        if needs_snapshot {
            changed |= self.poll_snapshot();
        } else {
            self.after_change();
        }
        changed
    }

    /// Tasks currently shown as buttons, in display order.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.state.snapshot_of(self.visible_keys())
    }

    /// Tasks in the overflow list (always empty in paged mode).
    pub fn hidden_tasks(&self) -> Vec<Task> {
        match self.config.display_mode {
            DisplayMode::Paged => Vec::new(),
            DisplayMode::Overflow => {
                let split = self.state.order().overflow(self.config.max_visible);
                self.state.snapshot_of(split.hidden)
            }
        }
    }

    pub fn view(&self) -> DockView {
        let order = self.state.order();
        let (page_count, paging_active) = match self.config.display_mode {
            DisplayMode::Paged => (
                order.page_count(self.config.page_size),
                order.paging_active(self.config.page_size),
            ),
            DisplayMode::Overflow => (1, false),
        };
        DockView {
            visible: self.visible_tasks(),
            hidden: self.hidden_tasks(),
            page: self.current_page,
            page_count,
            paging_active,
        }
    }

    fn visible_keys(&self) -> &[AppKey] {
        let order = self.state.order();
        match self.config.display_mode {
            DisplayMode::Paged => order.page(self.current_page, self.config.page_size),
            DisplayMode::Overflow => order.overflow(self.config.max_visible).visible,
        }
    }

    /// Index in the full order of the first visible button
    fn visible_offset(&self) -> usize {
        match self.config.display_mode {
            DisplayMode::Paged => self.current_page * self.config.page_size.max(1),
            DisplayMode::Overflow => 0,
        }
    }

    /// Map a drop X coordinate (relative to the first visible button) to a
    /// slot in the full order list.
    ///
    /// The slot is the number of visible buttons whose center lies left of `x`.
    pub fn drop_slot(&self, drop_x: f64) -> usize {
        let pitch = f64::from(self.config.button_pitch().max(1));
        let half = f64::from(self.config.button_width) / 2.0;
        let visible = self.visible_keys().len();
        let before = (0..visible)
            .take_while(|&i| (i as f64) * pitch + half < drop_x)
            .count();
        self.visible_offset() + before
    }

    /// Handle a drag-and-drop of `key` at `drop_x`. Returns whether the
    /// request was accepted.
    ///
    /// Moving a pinned task writes the new pinned order back.
    pub fn on_reorder_requested(&mut self, key: &AppKey, drop_x: f64) -> bool {
        let slot = self.drop_slot(drop_x);
        match self.state.reorder_to_slot(key, slot) {
            Ok(outcome) => {
                tracing::info!(key = %key, drop_x, slot, index = outcome.index, "reordered");
                if outcome.pinned_changed {
                    self.save_pinned();
                }
                true
            }
            Err(e) => {
                tracing::info!(error = %e, "reorder rejected");
                false
            }
        }
    }

    /// Toggle the pin of `key` and write the pinned list back. Returns the
    /// new pinned state.
    ///
    /// # Errors
    ///
    /// `UnknownTask` or `PinLimitReached`; state is unchanged in both cases.
    pub fn on_pin_toggle(&mut self, key: &AppKey) -> Result<bool, DockError> {
        let pinned = self.state.toggle_pin(key, self.config.max_pinned)?;
        self.save_pinned();
        self.after_change();
        Ok(pinned)
    }

    /// Focus `key` if it has windows, otherwise launch it.
    ///
    /// # Errors
    ///
    /// `UnknownTask`, or `CommandFailed` if the focus command or launch fails.
    pub fn activate(&mut self, key: &AppKey) -> Result<Activation, DockError> {
        let task = self
            .state
            .task(key)
            .ok_or_else(|| DockError::UnknownTask(key.clone()))?;

        if task.running {
            self.source.focus(key)?;
            return Ok(Activation::Focused);
        }

        let command = task.launch_command.clone();
        if self.launcher.launch(key, &command)? {
            Ok(Activation::Launched)
        } else {
            Ok(Activation::AlreadyLaunching)
        }
    }

    /// Ask the window manager to close `key`'s window. Returns whether a
    /// command was sent; tasks without windows are left alone.
    ///
    /// The task itself only goes away once a snapshot confirms it.
    ///
    /// # Errors
    ///
    /// `UnknownTask`, or `CommandFailed` if the close command fails.
    pub fn close(&mut self, key: &AppKey) -> Result<bool, DockError> {
        let task = self
            .state
            .task(key)
            .ok_or_else(|| DockError::UnknownTask(key.clone()))?;
        if !task.running {
            tracing::debug!(key = %key, "close on task without windows");
            return Ok(false);
        }
        self.source.close(key)?;
        Ok(true)
    }

    /// Go to the previous page. Returns whether the page changed.
    pub fn page_up(&mut self) -> bool {
        if self.current_page == 0 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Go to the next page. Returns whether the page changed.
    pub fn page_down(&mut self) -> bool {
        let next = self
            .state
            .order()
            .clamp_page(self.current_page + 1, self.config.page_size);
        if next == self.current_page {
            return false;
        }
        self.current_page = next;
        true
    }

    fn save_pinned(&mut self) {
        let entries = self.state.pinned_entries();
        if let Err(e) = self.store.save(&entries) {
            tracing::error!(error = %e, "failed to write pinned apps");
        }
    }

    /// Bookkeeping after any state change
    fn after_change(&mut self) {
        self.current_page = self
            .state
            .order()
            .clamp_page(self.current_page, self.config.page_size);
        for task in self.state.tasks_in_order() {
            if task.running {
                self.launcher.forget(&task.key);
            }
        }
    }
}

impl std::fmt::Debug for Dock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dock")
            .field("state", &self.state)
            .field("current_page", &self.current_page)
            .finish_non_exhaustive()
    }
}
