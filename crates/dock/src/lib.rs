//! Hyprdock engine
//!
//! Keeps the dock's task list in sync with the window manager: which apps
//! are pinned, which are running, which one has focus, and in what order
//! they are shown. This library exposes the engine modules for the
//! `hyprdock` binary and for testing.

pub mod config;
pub mod dock;
pub mod error;
pub mod event;
pub mod ipc;
pub mod launch;
pub mod order;
pub mod pinned;
pub mod setup;
pub mod state;
pub mod task;
pub mod window_source;

#[cfg(test)]
mod ipc_test;
