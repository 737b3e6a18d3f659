//! Test fixtures for common test scenarios

use dock::config::{Config, DisplayMode};

use crate::headless::TestDock;

/// Button geometry used by drop-coordinate tests: 36px buttons, 6px gaps
pub const TEST_BUTTON_WIDTH: u32 = 36;
pub const TEST_BUTTON_SPACING: u32 = 6;

/// X coordinate of the center of visible button `index`
pub fn button_center(index: usize) -> f64 {
    let pitch = f64::from(TEST_BUTTON_WIDTH + TEST_BUTTON_SPACING);
    index as f64 * pitch + f64::from(TEST_BUTTON_WIDTH) / 2.0
}

/// Drop X just past the right edge of visible button `index`
pub fn drop_after(index: usize) -> f64 {
    button_center(index) + 1.0
}

/// Drop X just before the center of visible button `index`
pub fn drop_before(index: usize) -> f64 {
    button_center(index) - 1.0
}

/// Paged config with `page_size` buttons per page
pub fn paged_config(page_size: usize) -> Config {
    Config {
        display_mode: DisplayMode::Paged,
        page_size,
        button_width: TEST_BUTTON_WIDTH,
        button_spacing: TEST_BUTTON_SPACING,
        ..Config::default()
    }
}

/// Overflow config showing `max_visible` buttons
pub fn overflow_config(max_visible: usize) -> Config {
    Config {
        display_mode: DisplayMode::Overflow,
        max_visible,
        button_width: TEST_BUTTON_WIDTH,
        button_spacing: TEST_BUTTON_SPACING,
        ..Config::default()
    }
}

/// Dock with `pinned` pinned and one window open for each of `running`
pub fn dock_with(pinned: &[&str], running: &[&str]) -> TestDock {
    dock_with_config(Config::default(), pinned, running)
}

/// Like [`dock_with`] with a custom config
pub fn dock_with_config(config: Config, pinned: &[&str], running: &[&str]) -> TestDock {
    let mut tdock = TestDock::with_config(config, pinned);
    for class in running {
        tdock.open(class);
    }
    tdock
}

/// Paged dock with `count` running apps named `app0`, `app1`, ...
pub fn paged_dock(page_size: usize, count: usize) -> TestDock {
    let names: Vec<String> = (0..count).map(|i| format!("app{i}")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    dock_with_config(paged_config(page_size), &[], &names)
}
