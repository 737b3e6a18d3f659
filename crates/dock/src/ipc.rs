//! Event channel connector
//!
//! Keeps a best-effort connection to the window manager's event socket
//! (Hyprland's `.socket2.sock`). The connector frames the byte stream into
//! newline-terminated records and decodes them; it holds no dock state and
//! never blocks. Retry timing lives with the event loop (see `setup.rs`).

use std::io::{self, Read};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::DockError;
use crate::event::WindowEvent;

/// Longest record we buffer before giving up on it (64 KB)
const MAX_RECORD_SIZE: usize = 64 * 1024;

/// Bytes read per `read` call
const READ_CHUNK_SIZE: usize = 4096;

/// Event socket file name inside the instance directory
const EVENT_SOCKET_NAME: &str = ".socket2.sock";

/// Request socket file name inside the instance directory
const REQUEST_SOCKET_NAME: &str = ".socket.sock";

/// IPC errors
#[derive(Debug, Error)]
pub enum IpcError {
    /// Socket missing or nobody listening
    #[error("event channel unavailable: {0}")]
    Unavailable(String),

    /// Peer closed the connection
    #[error("event channel closed by peer")]
    Closed,

    /// IO error during read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<IpcError> for DockError {
    fn from(e: IpcError) -> Self {
        DockError::ChannelUnavailable(e.to_string())
    }
}

/// Connection lifecycle of the event channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Reassembles newline-delimited records from arbitrary chunks
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    /// Discarding the rest of an oversized record until its newline
    skipping: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; returns every record completed by them, without terminators.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. A record longer than
    /// the size limit is dropped whole.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut records = Vec::new();
        let mut rest = bytes;

        while let Some(newline) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(newline);
            rest = &tail[1..];

            if self.skipping {
                self.skipping = false;
                continue;
            }
            self.pending.extend_from_slice(head);
            if self.pending.len() <= MAX_RECORD_SIZE {
                records.push(String::from_utf8_lossy(&self.pending).into_owned());
            } else {
                tracing::warn!(size = self.pending.len(), max = MAX_RECORD_SIZE, "dropping oversized event record");
            }
            self.pending.clear();
        }

        if !self.skipping {
            self.pending.extend_from_slice(rest);
            if self.pending.len() > MAX_RECORD_SIZE {
                tracing::warn!(size = self.pending.len(), max = MAX_RECORD_SIZE, "dropping oversized event record");
                self.pending.clear();
                self.skipping = true;
            }
        }
        records
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.skipping = false;
    }

    /// Bytes of an incomplete record waiting for its terminator
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Connection to the event socket
#[derive(Debug)]
pub struct EventConnector {
    /// Fixed socket path; `None` means discover the Hyprland instance on each attempt
    path_override: Option<PathBuf>,
    state: ConnectionState,
    stream: Option<UnixStream>,
    buffer: LineBuffer,
}

impl EventConnector {
    pub fn new(path_override: Option<PathBuf>) -> Self {
        Self {
            path_override,
            state: ConnectionState::Disconnected,
            stream: None,
            buffer: LineBuffer::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connected stream, for registering readiness with an event loop
    pub fn stream(&self) -> Option<&UnixStream> {
        self.stream.as_ref()
    }

    /// Try to open the event channel.
    ///
    /// Returns `Ok(false)` without doing anything if a connection is already
    /// established or in progress.
    ///
    /// # Errors
    ///
    /// `IpcError::Unavailable` if the socket can't be located or refuses the
    /// connection. The connector is left `Disconnected`.
    pub fn connect(&mut self) -> Result<bool, IpcError> {
        if self.state != ConnectionState::Disconnected {
            tracing::trace!(state = ?self.state, "connect suppressed");
            return Ok(false);
        }
        self.state = ConnectionState::Connecting;

        match self.open() {
            Ok((stream, path)) => {
                tracing::info!(?path, "event channel connected");
                self.buffer.clear();
                self.stream = Some(stream);
                self.state = ConnectionState::Connected;
                Ok(true)
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    fn open(&self) -> Result<(UnixStream, PathBuf), IpcError> {
        let path = match &self.path_override {
            Some(path) => path.clone(),
            None => event_socket_path()
                .ok_or_else(|| IpcError::Unavailable("no Hyprland instance found".to_string()))?,
        };
        if !path.exists() {
            return Err(IpcError::Unavailable(format!("{} does not exist", path.display())));
        }
        let stream = UnixStream::connect(&path)
            .map_err(|e| IpcError::Unavailable(format!("{}: {e}", path.display())))?;
        stream.set_nonblocking(true)?;
        Ok((stream, path))
    }

    /// Drain whatever is readable without blocking, decoding complete records into `out`.
    ///
    /// Events decoded before an error are still delivered. Malformed and
    /// unrecognized records are dropped.
    ///
    /// # Errors
    ///
    /// `IpcError::Closed` on end of stream, `IpcError::Io` on read failure.
    /// Either way the connector is `Disconnected` afterwards.
    pub fn read_events(&mut self, out: &mut Vec<WindowEvent>) -> Result<(), IpcError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(IpcError::Closed);
        };

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let result = loop {
            match stream.read(&mut chunk) {
                Ok(0) => break Err(IpcError::Closed),
                Ok(n) => {
                    for record in self.buffer.push(&chunk[..n]) {
                        decode_into(&record, out);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => break Err(IpcError::Io(e)),
            }
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, "event channel lost");
            self.disconnect();
        }
        result
    }

    /// Drop the connection and any partial record.
    pub fn disconnect(&mut self) {
        self.stream = None;
        self.buffer.clear();
        self.state = ConnectionState::Disconnected;
    }
}

fn decode_into(record: &str, out: &mut Vec<WindowEvent>) {
    if record.trim().is_empty() {
        return;
    }
    match WindowEvent::decode(record) {
        Ok(WindowEvent::Unknown { name }) => {
            tracing::trace!(event = %name, "ignoring event");
        }
        Ok(event) => {
            tracing::debug!(?event, "received event");
            out.push(event);
        }
        Err(e) => {
            tracing::debug!(error = %e, "dropping malformed record");
        }
    }
}

/// Runtime directory, falling back to `/run/user/<uid>`
fn runtime_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_RUNTIME_DIR") {
        return PathBuf::from(dir);
    }
    let uid = rustix::process::getuid().as_raw();
    PathBuf::from(format!("/run/user/{}", uid))
}

/// Directory of the running Hyprland instance.
///
/// Uses `HYPRLAND_INSTANCE_SIGNATURE` when set, otherwise the most recently
/// modified instance directory.
pub fn instance_dir() -> Option<PathBuf> {
    let hypr = runtime_dir().join("hypr");
    if let Ok(signature) = std::env::var("HYPRLAND_INSTANCE_SIGNATURE") {
        let dir = hypr.join(&signature);
        if dir.is_dir() {
            return Some(dir);
        }
        // Hyprland before 0.40 used /tmp
        let legacy = Path::new("/tmp/hypr").join(&signature);
        return legacy.is_dir().then_some(legacy);
    }
    newest_subdir(&hypr)
}

fn newest_subdir(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .max_by_key(|entry| entry.metadata().and_then(|m| m.modified()).ok())
        .map(|entry| entry.path())
}

/// Default event socket path
pub fn event_socket_path() -> Option<PathBuf> {
    instance_dir().map(|dir| dir.join(EVENT_SOCKET_NAME))
}

/// Default request socket path
pub fn request_socket_path() -> Option<PathBuf> {
    instance_dir().map(|dir| dir.join(REQUEST_SOCKET_NAME))
}
