//! Snapshot and event reconciliation
//!
//! Snapshots are authoritative for which classes run. Events only give
//! low-latency updates between snapshots: new windows and focus changes.
//! A close event can't say which class went away, so it changes nothing
//! here and the caller follows it with a snapshot.

use std::collections::HashSet;

use super::DockState;
use crate::event::WindowEvent;
use crate::task::{AppKey, WindowRecord};

impl DockState {
    /// Apply one decoded event. Returns whether any task changed.
    pub fn apply_event(&mut self, event: &WindowEvent) -> bool {
        let changed = match event {
            WindowEvent::Opened { address, key } => {
                if !address.is_empty() {
                    self.addresses.insert(address.clone(), key.clone());
                }
                match self.registry.get_mut(key) {
                    Some(task) if task.running => false,
                    Some(task) => {
                        task.running = true;
                        true
                    }
                    None => {
                        self.create_task(key.clone()).running = true;
                        true
                    }
                }
            }
            WindowEvent::Closed { address } => {
                self.addresses.remove(address);
                false
            }
            WindowEvent::Focused { key } => self.set_focus(key.as_ref()),
            WindowEvent::FocusedAddress { address } => match self.addresses.get(address).cloned() {
                Some(key) => self.set_focus(Some(&key)),
                None => {
                    tracing::debug!(address, "focus on unknown address, waiting for snapshot");
                    false
                }
            },
            WindowEvent::Unknown { .. } => false,
        };
        self.debug_check();
        changed
    }

    /// Replace running/focus state with a full window listing.
    ///
    /// Idempotent: applying the same listing twice changes nothing the second
    /// time. Returns whether any task changed.
    pub fn apply_snapshot(&mut self, windows: &[WindowRecord]) -> bool {
        let mut changed = false;

        // First-seen order so new tasks append in window order
        let mut running = HashSet::new();
        let mut discovered = Vec::new();
        for key in windows.iter().filter_map(WindowRecord::key) {
            if running.insert(key.clone()) {
                discovered.push(key);
            }
        }
        let focused: Option<AppKey> = windows.iter().find(|w| w.focused).and_then(WindowRecord::key);

        self.addresses = windows
            .iter()
            .filter(|w| !w.address.is_empty())
            .filter_map(|w| w.key().map(|k| (w.address.clone(), k)))
            .collect();

        for key in discovered {
            if !self.registry.contains_key(&key) {
                self.create_task(key);
                changed = true;
            }
        }

        for task in self.registry.values_mut() {
            let is_running = running.contains(&task.key);
            let is_focused = focused.as_ref() == Some(&task.key);
            if task.running != is_running || task.focused != is_focused {
                task.running = is_running;
                task.focused = is_focused;
                changed = true;
            }
        }

        changed |= self.prune();
        self.debug_check();
        changed
    }

    /// Focus exactly the task for `key`; `None` or an unknown key unfocuses all.
    fn set_focus(&mut self, key: Option<&AppKey>) -> bool {
        let mut changed = false;
        for task in self.registry.values_mut() {
            let focused = key == Some(&task.key);
            if task.focused != focused {
                task.focused = focused;
                changed = true;
            }
        }
        changed
    }
}
