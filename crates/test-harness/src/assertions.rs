//! Test assertions for dock state

use dock::dock::DockView;
use dock::state::DockState;

use crate::headless::TestDock;

/// Assert every registry/order invariant holds
pub fn assert_invariants(state: &DockState) {
    if let Err(violation) = state.check_invariants() {
        panic!("dock state invariant violated: {violation}\nstate: {state:#?}");
    }
}

/// Assert the full display order
pub fn assert_order(tdock: &TestDock, expected: &[&str]) {
    assert_eq!(tdock.order(), expected, "display order mismatch");
    assert_invariants(tdock.dock.state());
}

/// Assert which buttons are visible
pub fn assert_visible(tdock: &TestDock, expected: &[&str]) {
    assert_eq!(tdock.visible(), expected, "visible buttons mismatch");
}

/// Assert `display_order` of each view entry matches its position in the full order
pub fn assert_view_consistent(tdock: &TestDock, view: &DockView) {
    let order = tdock.order();
    for task in view.visible.iter().chain(&view.hidden) {
        assert_eq!(
            order.get(task.display_order).map(String::as_str),
            Some(task.key.as_str()),
            "{} reports display_order {} but order is {:?}",
            task.key,
            task.display_order,
            order
        );
    }
    assert!(view.page < view.page_count, "page {} of {}", view.page, view.page_count);
}

/// Assert exactly `expected` is focused (or nothing)
pub fn assert_focused(tdock: &TestDock, expected: Option<&str>) {
    let focused = tdock.dock.state().focused().map(|k| k.as_str().to_string());
    assert_eq!(focused.as_deref(), expected, "focused task mismatch");
}
