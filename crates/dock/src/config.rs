//! Runtime configuration

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::order::DEFAULT_PAGE_SIZE;
use crate::pinned::PinnedEntry;

/// System-wide config, read when the user has none
const SYSTEM_CONFIG: &str = "/etc/hyprdock/config.toml";

/// Where pinned-list changes are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// The user's config file
    pub write: PathBuf,
    /// File the settings were read from while `write` doesn't exist yet
    pub seed: Option<PathBuf>,
}

/// How tasks beyond the visible limit are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Fixed-size pages with up/down controls
    #[default]
    Paged,
    /// First `max_visible` tasks plus a "more" list
    Overflow,
}

/// Per-class overrides, applied to any app whether pinned or not
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOverride {
    /// Launch command
    pub exec: Option<String>,
    /// Icon path
    pub icon: Option<String>,
}

/// Dock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot poll interval (ms)
    pub snapshot_interval_ms: u64,

    /// Delay between event channel connection attempts (ms)
    pub retry_interval_ms: u64,

    /// Read/write timeout for window manager requests (ms)
    pub command_timeout_ms: u64,

    /// Paged or overflow presentation
    pub display_mode: DisplayMode,

    /// Tasks per page in paged mode
    pub page_size: usize,

    /// Tasks shown directly in overflow mode
    pub max_visible: usize,

    /// Maximum number of pinned apps
    pub max_pinned: usize,

    /// Button width (pixels), used to map drop coordinates to slots
    pub button_width: u32,

    /// Gap between buttons (pixels)
    pub button_spacing: u32,

    /// Event socket path override (defaults to the Hyprland `.socket2.sock`)
    pub event_socket: Option<PathBuf>,

    /// Request socket path override (defaults to the Hyprland `.socket.sock`)
    pub request_socket: Option<PathBuf>,

    /// Overrides keyed by window class
    pub apps: HashMap<String, AppOverride>,

    /// Pinned apps in display order
    pub pinned_apps: Vec<PinnedEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_interval_ms: 1000,
            retry_interval_ms: 1000,
            command_timeout_ms: 500,
            display_mode: DisplayMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            max_visible: DEFAULT_PAGE_SIZE,
            max_pinned: 10,
            button_width: 36,
            button_spacing: 6,
            event_socket: None,
            request_socket: None,
            apps: HashMap::new(),
            pinned_apps: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from the first existing config file, falling back to defaults.
    ///
    /// Pinned-list changes always go to the user's config file, even when the
    /// settings came from the system-wide one.
    pub fn load() -> (Self, ConfigPaths) {
        let user_path = dirs::config_dir().map(|p| p.join("hyprdock/config.toml"));
        Self::load_from_paths(user_path, Path::new(SYSTEM_CONFIG))
    }

    /// Search `user_path`, then `system_path`.
    pub fn load_from_paths(user_path: Option<PathBuf>, system_path: &Path) -> (Self, ConfigPaths) {
        let write = user_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("hyprdock.toml"));

        if let Some(path) = user_path.filter(|p| p.exists()) {
            if let Some(config) = Self::load_from(&path) {
                return (config, ConfigPaths { write, seed: None });
            }
        }

        if system_path.exists() {
            if let Some(config) = Self::load_from(system_path) {
                let seed = Some(system_path.to_path_buf());
                return (config, ConfigPaths { write, seed });
            }
        }

        tracing::info!("using default configuration");
        (Self::default(), ConfigPaths { write, seed: None })
    }

    /// Load an explicitly named file. A missing or invalid file yields defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(?path, "config file does not exist yet, using defaults");
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|| {
            tracing::warn!(?path, "using default configuration");
            Self::default()
        })
    }

    /// Load a specific file. Read and parse failures are logged and yield `None`.
    pub fn load_from(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => {
                    tracing::info!(
                        ?path,
                        pinned = config.pinned_apps.len(),
                        mode = ?config.display_mode,
                        "loaded configuration"
                    );
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "failed to parse config");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "failed to read config");
                None
            }
        }
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms.max(50))
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms.max(50))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms.max(1))
    }

    /// Horizontal distance between the starts of two adjacent buttons
    pub fn button_pitch(&self) -> u32 {
        self.button_width + self.button_spacing
    }
}

/// Helper for getting XDG directories
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_has_expected_values() {
        let config = Config::default();

        assert_eq!(config.snapshot_interval_ms, 1000);
        assert_eq!(config.retry_interval_ms, 1000);
        assert_eq!(config.display_mode, DisplayMode::Paged);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_visible, 10);
        assert_eq!(config.max_pinned, 10);
        assert_eq!(config.button_pitch(), 42);
        assert!(config.pinned_apps.is_empty());
        assert!(config.event_socket.is_none());
    }

    #[test]
    fn config_partial_toml_uses_defaults() {
        let partial_toml = r#"
            display_mode = "overflow"
            max_visible = 4

            [[pinned_apps]]
            class = "firefox"
        "#;

        let parsed: Config = toml::from_str(partial_toml).expect("Failed to parse partial TOML");

        assert_eq!(parsed.display_mode, DisplayMode::Overflow);
        assert_eq!(parsed.max_visible, 4);
        assert_eq!(parsed.page_size, 10);
        assert_eq!(parsed.pinned_apps.len(), 1);
        assert_eq!(parsed.pinned_apps[0].class, "firefox");
        assert_eq!(parsed.pinned_apps[0].exec, None);
    }

    #[test]
    fn config_invalid_toml_returns_error() {
        let result: Result<Config, _> = toml::from_str("this is not valid { toml [");
        assert!(result.is_err());
    }

    #[test]
    fn intervals_have_floor() {
        let mut config = Config::default();
        config.snapshot_interval_ms = 0;
        config.retry_interval_ms = 0;
        assert_eq!(config.snapshot_interval(), Duration::from_millis(50));
        assert_eq!(config.retry_interval(), Duration::from_millis(50));
    }

    #[test]
    fn load_from_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.toml")).is_none());
    }

    #[test]
    fn load_or_default_survives_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = [").unwrap();

        let config = Config::load_or_default(&path);
        assert_eq!(config.page_size, 10);
        assert!(config.pinned_apps.is_empty());
    }

    #[test]
    fn load_or_default_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 4").unwrap();
        assert_eq!(Config::load_or_default(&path).page_size, 4);
        assert_eq!(Config::load_or_default(&dir.path().join("missing.toml")).page_size, 10);
    }

    #[test]
    fn system_config_is_read_but_user_path_is_written() {
        let xdg = tempfile::tempdir().unwrap();
        let etc = tempfile::tempdir().unwrap();
        let user = xdg.path().join("hyprdock/config.toml");
        let system = etc.path().join("config.toml");
        std::fs::write(&system, "page_size = 6").unwrap();

        let (config, paths) = Config::load_from_paths(Some(user.clone()), &system);
        assert_eq!(config.page_size, 6);
        assert_eq!(paths.write, user);
        assert_eq!(paths.seed, Some(system));
    }

    #[test]
    fn user_config_wins_over_system() {
        let xdg = tempfile::tempdir().unwrap();
        let etc = tempfile::tempdir().unwrap();
        let user = xdg.path().join("config.toml");
        let system = etc.path().join("config.toml");
        std::fs::write(&user, "page_size = 3").unwrap();
        std::fs::write(&system, "page_size = 6").unwrap();

        let (config, paths) = Config::load_from_paths(Some(user.clone()), &system);
        assert_eq!(config.page_size, 3);
        assert_eq!(paths, ConfigPaths { write: user, seed: None });
    }

    #[test]
    fn invalid_user_config_falls_back_to_system() {
        let xdg = tempfile::tempdir().unwrap();
        let etc = tempfile::tempdir().unwrap();
        let user = xdg.path().join("config.toml");
        let system = etc.path().join("config.toml");
        std::fs::write(&user, "this is not valid { toml [").unwrap();
        std::fs::write(&system, "page_size = 6").unwrap();

        let (config, paths) = Config::load_from_paths(Some(user.clone()), &system);
        assert_eq!(config.page_size, 6);
        assert_eq!(paths.write, user);
    }

    #[test]
    fn no_config_files_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("hyprdock/config.toml");
        let (config, paths) = Config::load_from_paths(Some(user.clone()), &dir.path().join("etc.toml"));
        assert_eq!(config.page_size, 10);
        assert_eq!(paths, ConfigPaths { write: user, seed: None });
    }
}
