#![no_main]
//! Fuzz target for window snapshot parsing
//!
//! Feeds random bytes as a `j/clients` reply and reconciles whatever parses
//! into a dock state, checking the state invariants afterwards.

use libfuzzer_sys::fuzz_target;

use dock::state::DockState;
use dock::window_source::parse_clients;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(windows) = parse_clients(s) {
            let mut state = DockState::new();
            state.apply_snapshot(&windows);
            assert!(state.check_invariants().is_ok());
            assert!(!state.apply_snapshot(&windows));
        }
    }
});
