//! Pinned-list persistence
//!
//! The engine only ever replaces the pinned list as a whole. Everything else
//! in the config file, including unknown keys on pinned entries, is written
//! back untouched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DockError;
use crate::task::AppKey;

/// Config key holding the pinned list
const PINNED_KEY: &str = "pinned_apps";

/// One pinned app as stored in config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinnedEntry {
    /// Window class
    pub class: String,
    /// Launch command (defaults to the class)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,
    /// Icon path override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Keys this version doesn't know about, kept for write-back
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl PinnedEntry {
    pub fn new(class: &str, exec: Option<String>, icon: Option<String>) -> Self {
        Self {
            class: class.to_string(),
            exec,
            icon,
            extra: toml::Table::new(),
        }
    }

    pub fn key(&self) -> Option<AppKey> {
        AppKey::new(&self.class)
    }
}

/// Read/write access to the persisted pinned list
pub trait PinnedStore {
    /// Pinned entries in display order
    fn load(&mut self) -> Result<Vec<PinnedEntry>, DockError>;

    /// Replace the pinned list
    fn save(&mut self, entries: &[PinnedEntry]) -> Result<(), DockError>;
}

/// Stores the pinned list inside the TOML config file
///
/// Until the file exists, reads come from an optional seed file (the
/// system-wide config), and the first save copies its settings over.
#[derive(Debug, Clone)]
pub struct TomlPinnedStore {
    path: PathBuf,
    seed: Option<PathBuf>,
}

impl TomlPinnedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed: None,
        }
    }

    /// Read settings from `seed` while the store's own file is missing.
    pub fn with_seed(mut self, seed: Option<PathBuf>) -> Self {
        self.seed = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the store's file, or the seed if that doesn't exist yet. A
    /// missing file is an empty table.
    fn read_table(&self) -> Result<toml::Table, DockError> {
        if let Some(table) = read_toml(&self.path)? {
            return Ok(table);
        }
        match &self.seed {
            Some(seed) => Ok(read_toml(seed)?.unwrap_or_default()),
            None => Ok(toml::Table::new()),
        }
    }
}

/// Parse `path` as a TOML table. `None` if the file doesn't exist.
fn read_toml(path: &Path) -> Result<Option<toml::Table>, DockError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DockError::ConfigSync(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };
    content
        .parse::<toml::Table>()
        .map(Some)
        .map_err(|e| DockError::Decode {
            what: "config file",
            reason: format!("{}: {e}", path.display()),
        })
}

impl PinnedStore for TomlPinnedStore {
    fn load(&mut self) -> Result<Vec<PinnedEntry>, DockError> {
        let mut table = self.read_table()?;
        let Some(value) = table.remove(PINNED_KEY) else {
            return Ok(Vec::new());
        };
        value.try_into().map_err(|e: toml::de::Error| DockError::Decode {
            what: "pinned_apps",
            reason: e.to_string(),
        })
    }

    fn save(&mut self, entries: &[PinnedEntry]) -> Result<(), DockError> {
        // Refuse to clobber a file we can't parse
        let mut table = self.read_table()?;
        let value = toml::Value::try_from(entries)
            .map_err(|e| DockError::ConfigSync(format!("failed to encode pinned list: {e}")))?;
        table.insert(PINNED_KEY.to_string(), value);

        let content = toml::to_string(&table)
            .map_err(|e| DockError::ConfigSync(format!("failed to encode config: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DockError::ConfigSync(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        // Write-then-rename so a crash never leaves a truncated config
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)
            .map_err(|e| DockError::ConfigSync(format!("failed to write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            DockError::ConfigSync(format!("failed to replace {}: {e}", self.path.display()))
        })?;

        tracing::info!(path = ?self.path, pinned = entries.len(), "saved pinned apps");
        Ok(())
    }
}
