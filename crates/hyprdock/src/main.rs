//! hyprdock - dock task engine for Hyprland
//!
//! Keeps the list of pinned and running applications in sync with the
//! compositor and logs every change of the visible dock.
//!
//! # Usage
//!
//! ```sh
//! # Run the engine (Ctrl-C to stop)
//! hyprdock
//!
//! # Use a specific config file
//! hyprdock --config ~/dock.toml
//!
//! # Print the current dock as JSON and exit
//! hyprdock --once
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};

use dock::config::{Config, ConfigPaths};
use dock::dock::Dock;
use dock::pinned::TomlPinnedStore;
use dock::window_source::HyprlandSource;

mod cli;


fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = cli::Options::parse(&args)?;
    if options.help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    setup_logging();

    let (config, paths) = load_config(options.config);
    let source = HyprlandSource::new(config.request_socket.clone(), config.command_timeout());
    let store = TomlPinnedStore::new(paths.write).with_seed(paths.seed);
    let mut dock = Dock::new(config, Box::new(source), Box::new(store));

    if options.once {
        dock.load_pinned();
        dock.try_snapshot().context("failed to query open windows")?;
        let json = serde_json::to_string_pretty(&dock.view())?;
        println!("{json}");
        return Ok(());
    }

    tracing::info!("starting hyprdock");
    dock::setup::run(dock)
}

/// Config from `--config` or the search path, plus where pinned apps are written.
///
/// Never fails: unreadable or invalid files are logged and defaults used.
fn load_config(explicit: Option<PathBuf>) -> (Config, ConfigPaths) {
    match explicit {
        Some(path) => {
            let config = Config::load_or_default(&path);
            let paths = ConfigPaths {
                write: path,
                seed: None,
            };
            (config, paths)
        }
        None => Config::load(),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Respect NO_COLOR environment variable for testing
    let use_ansi = std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(use_ansi),
        )
        .with(filter)
        .init();
}
