//! In-memory stand-ins for the window manager and the config file
//!
//! Both fakes are cheap handles over shared state, so a test can keep one
//! copy while the other is boxed into a [`dock::dock::Dock`].

use std::cell::RefCell;
use std::rc::Rc;

use dock::error::DockError;
use dock::pinned::{PinnedEntry, PinnedStore};
use dock::task::{AppKey, WindowRecord};
use dock::window_source::WindowSource;

/// A command the dock sent to the window manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCommand {
    Focus(AppKey),
    Close(AppKey),
}

#[derive(Debug, Default)]
struct Windows {
    windows: Vec<WindowRecord>,
    next_address: u64,
    failing_snapshots: usize,
    fail_commands: bool,
    commands: Vec<SentCommand>,
    snapshot_calls: usize,
}

/// Scripted window manager
#[derive(Debug, Clone, Default)]
pub struct FakeWindowSource {
    inner: Rc<RefCell<Windows>>,
}

impl FakeWindowSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window of `class`. Returns its address.
    pub fn open(&self, class: &str) -> String {
        let mut inner = self.inner.borrow_mut();
        inner.next_address += 1;
        let address = format!("{:x}", 0x5500_0000 + inner.next_address);
        inner.windows.push(WindowRecord {
            address: address.clone(),
            workspace_id: 1,
            ..WindowRecord::with_class(class)
        });
        address
    }

    /// Remove the window with `address`. Returns whether it existed.
    pub fn close_address(&self, address: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.windows.len();
        inner.windows.retain(|w| w.address != address);
        inner.windows.len() != before
    }

    /// Remove every window whose class matches `class` case-insensitively.
    pub fn close_class(&self, class: &str) {
        let key = AppKey::new(class);
        self.inner.borrow_mut().windows.retain(|w| w.key() != key);
    }

    /// Mark the first window of `class` focused and every other unfocused.
    pub fn focus_class(&self, class: &str) {
        let key = AppKey::new(class);
        let mut inner = self.inner.borrow_mut();
        let mut found = false;
        for window in &mut inner.windows {
            window.focused = !found && window.key() == key;
            found |= window.focused;
        }
    }

    /// Replace the whole window list.
    pub fn set_windows(&self, windows: Vec<WindowRecord>) {
        self.inner.borrow_mut().windows = windows;
    }

    pub fn windows(&self) -> Vec<WindowRecord> {
        self.inner.borrow().windows.clone()
    }

    /// Make the next `count` snapshot queries fail.
    pub fn fail_snapshots(&self, count: usize) {
        self.inner.borrow_mut().failing_snapshots = count;
    }

    /// Make focus and close commands fail.
    pub fn fail_commands(&self, fail: bool) {
        self.inner.borrow_mut().fail_commands = fail;
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> Vec<SentCommand> {
        self.inner.borrow().commands.clone()
    }

    pub fn snapshot_calls(&self) -> usize {
        self.inner.borrow().snapshot_calls
    }

    fn command(&self, command: SentCommand) -> Result<(), DockError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_commands {
            return Err(DockError::CommandFailed {
                command: format!("{command:?}"),
                reason: "injected failure".to_string(),
            });
        }
        inner.commands.push(command);
        Ok(())
    }
}

impl WindowSource for FakeWindowSource {
    fn snapshot(&mut self) -> Result<Vec<WindowRecord>, DockError> {
        let mut inner = self.inner.borrow_mut();
        inner.snapshot_calls += 1;
        if inner.failing_snapshots > 0 {
            inner.failing_snapshots -= 1;
            return Err(DockError::CommandFailed {
                command: "j/clients".to_string(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(inner.windows.clone())
    }

    fn focus(&mut self, key: &AppKey) -> Result<(), DockError> {
        self.command(SentCommand::Focus(key.clone()))
    }

    fn close(&mut self, key: &AppKey) -> Result<(), DockError> {
        self.command(SentCommand::Close(key.clone()))
    }
}

#[derive(Debug, Default)]
struct Stored {
    entries: Vec<PinnedEntry>,
    saves: usize,
    fail_load: bool,
    fail_save: bool,
}

/// Pinned list kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPinnedStore {
    inner: Rc<RefCell<Stored>>,
}

impl MemoryPinnedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with bare entries for `classes`
    pub fn with_classes(classes: &[&str]) -> Self {
        let store = Self::new();
        store.inner.borrow_mut().entries =
            classes.iter().map(|c| PinnedEntry::new(c, None, None)).collect();
        store
    }

    pub fn entries(&self) -> Vec<PinnedEntry> {
        self.inner.borrow().entries.clone()
    }

    /// Stored classes, in order
    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().entries.iter().map(|e| e.class.clone()).collect()
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.inner.borrow().saves
    }

    pub fn fail_load(&self, fail: bool) {
        self.inner.borrow_mut().fail_load = fail;
    }

    pub fn fail_save(&self, fail: bool) {
        self.inner.borrow_mut().fail_save = fail;
    }
}

impl PinnedStore for MemoryPinnedStore {
    fn load(&mut self) -> Result<Vec<PinnedEntry>, DockError> {
        let inner = self.inner.borrow();
        if inner.fail_load {
            return Err(DockError::ConfigSync("injected load failure".to_string()));
        }
        Ok(inner.entries.clone())
    }

    fn save(&mut self, entries: &[PinnedEntry]) -> Result<(), DockError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_save {
            return Err(DockError::ConfigSync("injected save failure".to_string()));
        }
        inner.entries = entries.to_vec();
        inner.saves += 1;
        Ok(())
    }
}
