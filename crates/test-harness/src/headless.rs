//! Headless dock wrapper for testing
//!
//! [`TestDock`] plays the window manager: every simulated window change
//! updates the fake window list and delivers the matching event, the way
//! Hyprland's event socket would.

use dock::config::Config;
use dock::dock::{Dock, DockView};
use dock::event::WindowEvent;
use dock::task::{AppKey, Task};

use crate::fakes::{FakeWindowSource, MemoryPinnedStore};

/// Dock engine wired to fakes
pub struct TestDock {
    pub dock: Dock,
    pub windows: FakeWindowSource,
    pub store: MemoryPinnedStore,
}

impl TestDock {
    /// Started dock with default config and nothing pinned
    pub fn new() -> Self {
        Self::with_config(Config::default(), &[])
    }

    /// Started dock with `pinned` in the store
    pub fn with_pinned(pinned: &[&str]) -> Self {
        Self::with_config(Config::default(), pinned)
    }

    /// Started dock with a custom config
    pub fn with_config(config: Config, pinned: &[&str]) -> Self {
        let mut tdock = Self::unstarted(config, pinned);
        tdock.dock.start();
        tdock
    }

    /// Dock that hasn't loaded pins or taken a snapshot yet
    pub fn unstarted(config: Config, pinned: &[&str]) -> Self {
        let windows = FakeWindowSource::new();
        let store = MemoryPinnedStore::with_classes(pinned);
        let dock = Dock::new(config, Box::new(windows.clone()), Box::new(store.clone()));
        Self { dock, windows, store }
    }

    /// Open a window and deliver `openwindow`. Returns its address.
    pub fn open(&mut self, class: &str) -> String {
        let address = self.windows.open(class);
        if let Some(key) = AppKey::new(class) {
            self.dock.apply_events(&[WindowEvent::Opened {
                address: address.clone(),
                key,
            }]);
        }
        address
    }

    /// Close one window and deliver `closewindow`.
    pub fn close_window(&mut self, address: &str) {
        self.windows.close_address(address);
        self.dock.apply_events(&[WindowEvent::Closed {
            address: address.to_string(),
        }]);
    }

    /// Focus a class and deliver `activewindow`.
    pub fn focus(&mut self, class: &str) {
        self.windows.focus_class(class);
        self.dock.apply_events(&[WindowEvent::Focused {
            key: AppKey::new(class),
        }]);
    }

    /// Run one snapshot poll.
    pub fn poll(&mut self) -> bool {
        self.dock.poll_snapshot()
    }

    /// Full display order as strings
    pub fn order(&self) -> Vec<String> {
        self.dock
            .state()
            .order()
            .keys()
            .iter()
            .map(|k| k.as_str().to_string())
            .collect()
    }

    /// Visible buttons as strings
    pub fn visible(&self) -> Vec<String> {
        self.dock
            .visible_tasks()
            .into_iter()
            .map(|t| t.key.as_str().to_string())
            .collect()
    }

    pub fn view(&self) -> DockView {
        self.dock.view()
    }

    pub fn task(&self, class: &str) -> Option<Task> {
        let key = AppKey::new(class)?;
        self.dock.state().task(&key).cloned()
    }
}

impl Default for TestDock {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a key that is known to be valid
pub fn key(class: &str) -> AppKey {
    AppKey::new(class).unwrap_or_else(|| panic!("blank test key {class:?}"))
}
