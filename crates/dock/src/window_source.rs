//! Window manager queries and commands
//!
//! [`WindowSource`] is the seam between the dock and the window manager:
//! snapshot queries plus fire-and-forget focus/close commands. The Hyprland
//! implementation speaks the request socket (`.socket.sock`) directly, one
//! connection per request, with read/write timeouts so a stuck compositor
//! can't stall the event loop.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::DockError;
use crate::task::{normalize_address, AppKey, WindowRecord};

/// Largest reply accepted from the request socket (4 MB)
const MAX_REPLY_SIZE: usize = 4 * 1024 * 1024;

/// Queries and commands against the window manager
pub trait WindowSource {
    /// All open windows, in the order the window manager lists them.
    ///
    /// A failed query is an error, never an empty list, so callers can skip
    /// the cycle instead of treating every app as closed.
    fn snapshot(&mut self) -> Result<Vec<WindowRecord>, DockError>;

    /// Focus a window of the given class
    fn focus(&mut self, key: &AppKey) -> Result<(), DockError>;

    /// Close a window of the given class
    fn close(&mut self, key: &AppKey) -> Result<(), DockError>;
}

/// `workspace` object inside a client record
#[derive(Debug, Deserialize)]
struct WorkspaceJson {
    #[serde(default = "WorkspaceJson::unknown_id")]
    id: i64,
}

impl WorkspaceJson {
    fn unknown_id() -> i64 {
        -1
    }
}

impl Default for WorkspaceJson {
    fn default() -> Self {
        Self { id: Self::unknown_id() }
    }
}

/// One entry of `j/clients`
#[derive(Debug, Deserialize)]
struct ClientJson {
    #[serde(default)]
    class: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    workspace: WorkspaceJson,
    #[serde(default)]
    address: String,
    #[serde(default)]
    focused: Option<bool>,
    #[serde(default, rename = "focusHistoryID")]
    focus_history_id: Option<i64>,
    #[serde(default)]
    mapped: Option<bool>,
}

/// Parse a `j/clients` reply.
///
/// Unmapped windows are skipped. Focus comes from a `focused` flag when
/// present, otherwise from `focusHistoryID == 0`.
///
/// # Errors
///
/// `DockError::Decode` if the reply isn't a JSON array of client objects.
pub fn parse_clients(json: &str) -> Result<Vec<WindowRecord>, DockError> {
    let clients: Vec<ClientJson> = serde_json::from_str(json).map_err(|e| DockError::Decode {
        what: "window snapshot",
        reason: e.to_string(),
    })?;

    Ok(clients
        .into_iter()
        .filter(|c| c.mapped != Some(false))
        .map(|c| WindowRecord {
            focused: c.focused.unwrap_or(c.focus_history_id == Some(0)),
            class: c.class,
            title: c.title,
            workspace_id: c.workspace.id,
            address: normalize_address(&c.address),
        })
        .collect())
}

/// Case-insensitive, anchored window rule matching exactly `key`
pub fn class_selector(key: &AppKey) -> String {
    let mut pattern = String::with_capacity(key.as_str().len() + 16);
    for c in key.as_str().chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    format!("class:(?i)^{pattern}$")
}

/// Hyprland request socket client
#[derive(Debug, Clone)]
pub struct HyprlandSource {
    /// Fixed socket path; `None` means discover the instance per request
    path_override: Option<PathBuf>,
    timeout: Duration,
}

impl HyprlandSource {
    pub fn new(path_override: Option<PathBuf>, timeout: Duration) -> Self {
        Self { path_override, timeout }
    }

    fn socket_path(&self) -> Option<PathBuf> {
        self.path_override.clone().or_else(crate::ipc::request_socket_path)
    }

    /// Send one request and read the whole reply.
    pub fn request(&self, command: &str) -> Result<String, DockError> {
        let path = self
            .socket_path()
            .ok_or_else(|| DockError::command(command, "no Hyprland instance found"))?;
        self.request_at(&path, command)
            .map_err(|e| DockError::command(command, e))
    }

    fn request_at(&self, path: &std::path::Path, command: &str) -> io::Result<String> {
        let mut stream = UnixStream::connect(path)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.write_all(command.as_bytes())?;
        stream.flush()?;

        let mut reply = Vec::new();
        stream.take(MAX_REPLY_SIZE as u64 + 1).read_to_end(&mut reply)?;
        if reply.len() > MAX_REPLY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("reply larger than {MAX_REPLY_SIZE} bytes"),
            ));
        }
        String::from_utf8(reply).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Run a dispatcher and check for the `ok` acknowledgement.
    fn dispatch(&self, dispatcher: &str, arg: &str) -> Result<(), DockError> {
        let command = format!("dispatch {dispatcher} {arg}");
        let reply = self.request(&command)?;
        if reply.trim() == "ok" {
            tracing::debug!(command = %command, "dispatch ok");
            Ok(())
        } else {
            Err(DockError::command(command, reply.trim()))
        }
    }
}

impl WindowSource for HyprlandSource {
    fn snapshot(&mut self) -> Result<Vec<WindowRecord>, DockError> {
        let reply = self.request("j/clients")?;
        parse_clients(&reply)
    }

    fn focus(&mut self, key: &AppKey) -> Result<(), DockError> {
        self.dispatch("focuswindow", &class_selector(key))
    }

    fn close(&mut self, key: &AppKey) -> Result<(), DockError> {
        self.dispatch("closewindow", &class_selector(key))
    }
}
