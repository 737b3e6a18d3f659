//! Application launching
//!
//! A launch is one external call. The launcher remembers the child it
//! started per key so that double-clicking an app that hasn't mapped its
//! window yet doesn't start a second copy.

use std::collections::HashMap;
use std::process::{Child, Command, Stdio};

use crate::error::DockError;
use crate::task::AppKey;

/// Starts applications and tracks children until they exit
#[derive(Debug, Default)]
pub struct Launcher {
    /// Children whose window hasn't shown up yet, by key
    children: HashMap<AppKey, Child>,
    /// Children that mapped a window; still reaped, no longer block launches
    detached: Vec<Child>,
}

impl Launcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a child started for `key` is still alive
    pub(crate) fn is_pending(&mut self, key: &AppKey) -> bool {
        self.reap();
        self.children.contains_key(key)
    }

    /// Start `command` for `key`.
    ///
    /// The command is split on whitespace; no shell is involved. Returns
    /// `Ok(false)` if an earlier launch for `key` is still alive.
    ///
    /// # Errors
    ///
    /// `DockError::CommandFailed` if the command is empty or can't be spawned.
    pub fn launch(&mut self, key: &AppKey, command: &str) -> Result<bool, DockError> {
        if self.is_pending(key) {
            tracing::info!(key = %key, "launch already in progress");
            return Ok(false);
        }

        let mut argv = command.split_whitespace();
        let program = argv
            .next()
            .ok_or_else(|| DockError::command(command, "empty launch command"))?;

        let child = Command::new(program)
            .args(argv)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DockError::command(command, e))?;

        tracing::info!(key = %key, command, pid = child.id(), "launched");
        self.children.insert(key.clone(), child);
        Ok(true)
    }

    /// Stop suppressing launches for `key` once its window shows up, so a
    /// later launch isn't blocked by a long-lived process.
    ///
    /// The child stays tracked until it exits.
    pub fn forget(&mut self, key: &AppKey) {
        if let Some(child) = self.children.remove(key) {
            self.detached.push(child);
        }
    }

    /// Collect exited children without blocking.
    pub fn reap(&mut self) {
        self.children.retain(|key, child| still_running(child, key.as_str()));
        self.detached.retain_mut(|child| still_running(child, "detached"));
    }

    /// Number of children not yet reaped
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.children.len() + self.detached.len()
    }
}

/// Poll `child` once. An error counts as gone so it isn't polled forever.
fn still_running(child: &mut Child, key: &str) -> bool {
    match child.try_wait() {
        Ok(Some(status)) => {
            tracing::debug!(key, pid = child.id(), ?status, "launched process exited");
            false
        }
        Ok(None) => true,
        Err(e) => {
            tracing::warn!(key, pid = child.id(), error = ?e, "failed to poll launched process");
            false
        }
    }
}
