#![no_main]
//! Fuzz target for config TOML parsing
//!
//! Feeds random bytes as TOML to the config parser and loads any pinned
//! list that parses into a dock state.

use libfuzzer_sys::fuzz_target;

use dock::config::Config;
use dock::state::DockState;

fuzz_target!(|data: &[u8]| {
    // Try parsing as TOML config - must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<Config>(s) {
            let mut state = DockState::from_config(&config);
            state.load_pinned(config.pinned_apps.clone());
            assert!(state.check_invariants().is_ok());
            let _ = config.snapshot_interval();
        }
    }
});
