//! Dock state: task registry plus display order
//!
//! This module owns the only mutable copy of the dock's tasks. Registry and
//! order list are always changed together so that both hold exactly the same
//! keys.
//!
//! # Responsibilities
//!
//! - Registry lifecycle (tasks exist while pinned or running)
//! - Reconciling snapshots and events (see `reconcile.rs`)
//! - Pinning and reordering (see `pinning.rs`)
//!
//! # NOT Responsible For
//!
//! - Talking to the window manager (see `window_source.rs` and `ipc.rs`)
//! - Persisting the pinned list (see `pinned.rs`)
//! - Page selection and presentation (see `dock.rs` and `order.rs`)

mod pinning;
mod reconcile;

use std::collections::{HashMap, HashSet};

use crate::config::{AppOverride, Config};
use crate::order::OrderList;
use crate::pinned::PinnedEntry;
use crate::task::{AppKey, Task};

pub use pinning::ReorderOutcome;

/// Registry, order list and the bookkeeping that keeps them consistent
#[derive(Debug, Clone, Default)]
pub struct DockState {
    /// Tasks by key
    registry: HashMap<AppKey, Task>,

    /// Display order, same key set as `registry`
    order: OrderList,

    /// Full config entries of pinned tasks, for write-back
    pinned_entries: HashMap<AppKey, PinnedEntry>,

    /// Window address to class, learned from snapshots and open events
    addresses: HashMap<String, AppKey>,

    /// Launch/icon overrides by normalized class
    overrides: HashMap<AppKey, AppOverride>,
}

impl DockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state using the config's per-app overrides
    pub fn from_config(config: &Config) -> Self {
        let overrides = config
            .apps
            .iter()
            .filter_map(|(class, o)| AppKey::new(class).map(|k| (k, o.clone())))
            .collect();
        Self {
            overrides,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn task(&self, key: &AppKey) -> Option<&Task> {
        self.registry.get(key)
    }

    pub fn contains(&self, key: &AppKey) -> bool {
        self.registry.contains_key(key)
    }

    pub fn order(&self) -> &OrderList {
        &self.order
    }

    /// Key of the focused task, if any
    pub fn focused(&self) -> Option<&AppKey> {
        self.registry.values().find(|t| t.focused).map(|t| &t.key)
    }

    /// Owned copies of the given keys' tasks, with `display_order` filled in
    /// from their position in the full order list.
    pub fn snapshot_of(&self, keys: &[AppKey]) -> Vec<Task> {
        keys.iter()
            .filter_map(|key| {
                let task = self.registry.get(key)?;
                let mut task = task.clone();
                task.display_order = self.order.position(key).unwrap_or_default();
                Some(task)
            })
            .collect()
    }

    /// All tasks in display order
    pub fn tasks_in_order(&self) -> Vec<Task> {
        self.snapshot_of(self.order.keys())
    }

    /// Resolve a window address seen on either socket
    #[cfg(test)]
    pub(crate) fn key_for_address(&self, address: &str) -> Option<&AppKey> {
        self.addresses.get(address)
    }

    /// Verify registry/order consistency.
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        let keys = self.order.keys();
        let unique: HashSet<&AppKey> = keys.iter().collect();
        if unique.len() != keys.len() {
            return Err(format!("order list has duplicates: {keys:?}"));
        }
        if keys.len() != self.registry.len() {
            return Err(format!(
                "order list has {} keys, registry has {}",
                keys.len(),
                self.registry.len()
            ));
        }
        for key in keys {
            let Some(task) = self.registry.get(key) else {
                return Err(format!("{key} ordered but not in registry"));
            };
            if !task.should_exist() {
                return Err(format!("{key} is neither pinned nor running"));
            }
            if task.pinned != self.pinned_entries.contains_key(key) {
                return Err(format!("{key} pinned flag disagrees with pinned entries"));
            }
        }
        if self.pinned_entries.keys().any(|k| !self.registry.contains_key(k)) {
            return Err("pinned entry without a task".to_string());
        }
        let focused = self.registry.values().filter(|t| t.focused).count();
        if focused > 1 {
            return Err(format!("{focused} tasks focused"));
        }
        Ok(())
    }

    /// Create a task for `key` with launch settings from the overrides.
    fn create_task(&mut self, key: AppKey) -> &mut Task {
        let o = self.overrides.get(&key);
        let launch = o
            .and_then(|o| o.exec.clone())
            .unwrap_or_else(|| key.as_str().to_string());
        let icon = o.and_then(|o| o.icon.clone());
        self.order.insert(key.clone());
        tracing::debug!(key = %key, "task created");
        self.registry
            .entry(key.clone())
            .or_insert_with(|| Task::new(key, launch, icon))
    }

    /// Drop `key` from registry and order list together.
    fn remove_task(&mut self, key: &AppKey) {
        self.registry.remove(key);
        self.order.remove(key);
        self.pinned_entries.remove(key);
        tracing::debug!(key = %key, "task removed");
    }

    /// Remove every task that is neither pinned nor running. Returns whether any was removed.
    fn prune(&mut self) -> bool {
        let stale: Vec<AppKey> = self
            .registry
            .values()
            .filter(|t| !t.should_exist())
            .map(|t| t.key.clone())
            .collect();
        for key in &stale {
            self.remove_task(key);
        }
        !stale.is_empty()
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_invariants().is_ok(),
            "dock state invariant violated: {:?}",
            self.check_invariants()
        );
    }
}
