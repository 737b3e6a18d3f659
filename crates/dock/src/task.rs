//! Dock task model
//!
//! A task is one dock entry: an application class that is pinned, running, or both.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized application class used as the registry key.
///
/// Window classes are compared case-insensitively, so the key is stored
/// trimmed and lowercased. An empty class never produces a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppKey(String);

impl AppKey {
    /// Normalize a window class into a key, or `None` if the class is blank.
    pub fn new(class: &str) -> Option<Self> {
        let trimmed = class.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AppKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One dock entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Registry key (normalized window class)
    pub key: AppKey,
    /// Command used to start the application
    pub launch_command: String,
    /// Icon path override from config, if any
    pub icon: Option<String>,
    /// Present in the persisted pinned list
    pub pinned: bool,
    /// At least one window of this class exists
    pub running: bool,
    /// This class owns the active window
    pub focused: bool,
    /// Position in the display order. Filled in when a view is taken.
    pub display_order: usize,
}

impl Task {
    pub(crate) fn new(key: AppKey, launch_command: String, icon: Option<String>) -> Self {
        Self {
            key,
            launch_command,
            icon,
            pinned: false,
            running: false,
            focused: false,
            display_order: 0,
        }
    }

    /// A task only exists while it is pinned or has a window.
    pub fn should_exist(&self) -> bool {
        self.pinned || self.running
    }
}

/// Normalize a window address: lowercase hex without the `0x` prefix.
///
/// The request socket reports `0x55d0c7a1b2c0` while the event socket
/// reports `55d0c7a1b2c0` for the same window.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let bare = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    bare.to_ascii_lowercase()
}

/// One window as reported by a snapshot query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub class: String,
    pub title: String,
    pub workspace_id: i64,
    /// Normalized with [`normalize_address`]
    pub address: String,
    pub focused: bool,
}

impl WindowRecord {
    /// Convenience constructor for a window with only a class.
    pub fn with_class(class: &str) -> Self {
        Self {
            class: class.to_string(),
            title: String::new(),
            workspace_id: -1,
            address: String::new(),
            focused: false,
        }
    }

    pub fn key(&self) -> Option<AppKey> {
        AppKey::new(&self.class)
    }
}
