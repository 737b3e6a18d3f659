//! Test harness for hyprdock
//!
//! Provides infrastructure for driving the dock engine without Hyprland.
//!
//! # Modules
//!
//! - `fakes`: scripted window source and in-memory pinned store
//! - `headless`: dock wrapper that keeps the fake window list and the
//!   event stream consistent
//! - `assertions`: common test assertions
//! - `fixtures`: test fixture helpers

pub mod assertions;
pub mod fakes;
pub mod fixtures;
pub mod headless;

pub use fakes::{FakeWindowSource, MemoryPinnedStore, SentCommand};
pub use headless::TestDock;
