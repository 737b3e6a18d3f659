//! Pinning and manual reordering
//!
//! Both change what has to be written back to the pinned list, so every
//! operation here reports whether the persisted state is now stale.

use super::DockState;
use crate::error::DockError;
use crate::pinned::PinnedEntry;
use crate::task::AppKey;

/// Result of a reorder request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderOutcome {
    /// Final position of the moved key
    pub index: usize,
    /// The relative order of pinned tasks changed and must be written back
    pub pinned_changed: bool,
}

impl DockState {
    /// Install the persisted pinned list.
    ///
    /// Entries are ordered as given, ahead of anything discovered later.
    /// Blank and duplicate classes are skipped. Tasks that were pinned before
    /// but are missing from `entries` lose their pin.
    pub fn load_pinned(&mut self, entries: Vec<PinnedEntry>) {
        let mut seen = Vec::new();
        for entry in entries {
            let Some(key) = entry.key() else {
                tracing::warn!(class = %entry.class, "ignoring pinned entry with blank class");
                continue;
            };
            if seen.contains(&key) {
                tracing::warn!(key = %key, "ignoring duplicate pinned entry");
                continue;
            }
            seen.push(key.clone());

            if !self.registry.contains_key(&key) {
                self.create_task(key.clone());
            }
            if let Some(task) = self.registry.get_mut(&key) {
                task.pinned = true;
                if let Some(exec) = &entry.exec {
                    task.launch_command = exec.clone();
                }
                if entry.icon.is_some() {
                    task.icon = entry.icon.clone();
                }
            }
            self.pinned_entries.insert(key, entry);
        }

        let dropped: Vec<AppKey> = self
            .pinned_entries
            .keys()
            .filter(|k| !seen.contains(*k))
            .cloned()
            .collect();
        for key in dropped {
            self.pinned_entries.remove(&key);
            if let Some(task) = self.registry.get_mut(&key) {
                task.pinned = false;
            }
        }
        self.prune();
        self.debug_check();
        tracing::info!(pinned = seen.len(), "pinned apps loaded");
    }

    /// Number of pinned tasks
    pub fn pinned_count(&self) -> usize {
        self.pinned_entries.len()
    }

    /// Pinned keys in display order
    pub fn pinned_keys(&self) -> Vec<AppKey> {
        self.order
            .keys()
            .iter()
            .filter(|k| self.pinned_entries.contains_key(*k))
            .cloned()
            .collect()
    }

    /// Pinned config entries in display order, for write-back
    pub fn pinned_entries(&self) -> Vec<PinnedEntry> {
        self.order
            .keys()
            .iter()
            .filter_map(|k| self.pinned_entries.get(k).cloned())
            .collect()
    }

    /// Pin or unpin `key`. Returns whether anything changed.
    ///
    /// Unpinning a task without windows removes it.
    ///
    /// # Errors
    ///
    /// `UnknownTask` if `key` isn't in the dock, `PinLimitReached` when
    /// pinning would exceed `max_pinned`.
    pub fn set_pinned(&mut self, key: &AppKey, pinned: bool, max_pinned: usize) -> Result<bool, DockError> {
        let pinned_count = self.pinned_entries.len();
        let task = self
            .registry
            .get_mut(key)
            .ok_or_else(|| DockError::UnknownTask(key.clone()))?;
        if task.pinned == pinned {
            return Ok(false);
        }

        if pinned {
            if pinned_count >= max_pinned {
                return Err(DockError::PinLimitReached { max: max_pinned });
            }
            task.pinned = true;
            let exec = (task.launch_command != key.as_str()).then(|| task.launch_command.clone());
            let entry = PinnedEntry::new(key.as_str(), exec, task.icon.clone());
            self.pinned_entries.insert(key.clone(), entry);
            tracing::info!(key = %key, "pinned");
        } else {
            task.pinned = false;
            self.pinned_entries.remove(key);
            if !task.running {
                self.remove_task(key);
            }
            tracing::info!(key = %key, "unpinned");
        }
        self.debug_check();
        Ok(true)
    }

    /// Flip the pin of `key`. Returns the new pinned state.
    ///
    /// # Errors
    ///
    /// Same as [`DockState::set_pinned`].
    pub fn toggle_pin(&mut self, key: &AppKey, max_pinned: usize) -> Result<bool, DockError> {
        let pinned = self
            .registry
            .get(key)
            .map(|t| t.pinned)
            .ok_or_else(|| DockError::UnknownTask(key.clone()))?;
        self.set_pinned(key, !pinned, max_pinned)?;
        Ok(!pinned)
    }

    /// Move `key` to `target_index` (see [`crate::order::OrderList::reorder`]).
    ///
    /// # Errors
    ///
    /// `ReorderRejected` if the key vanished, e.g. its app closed mid-drag.
    pub fn reorder(&mut self, key: &AppKey, target_index: usize) -> Result<ReorderOutcome, DockError> {
        self.reorder_with(|order| order.reorder(key, target_index))
    }

    /// Move `key` to a drop slot in original coordinates
    /// (see [`crate::order::OrderList::reorder_to_slot`]).
    ///
    /// # Errors
    ///
    /// `ReorderRejected` if the key vanished.
    pub fn reorder_to_slot(&mut self, key: &AppKey, slot: usize) -> Result<ReorderOutcome, DockError> {
        self.reorder_with(|order| order.reorder_to_slot(key, slot))
    }

    fn reorder_with(
        &mut self,
        op: impl FnOnce(&mut crate::order::OrderList) -> Result<usize, DockError>,
    ) -> Result<ReorderOutcome, DockError> {
        let before = self.pinned_keys();
        let index = op(&mut self.order)?;
        let pinned_changed = self.pinned_keys() != before;
        self.debug_check();
        Ok(ReorderOutcome { index, pinned_changed })
    }
}
