//! End-to-end reconciliation scenarios
//!
//! Each test drives the engine the way Hyprland would: window changes land in
//! the fake window list and arrive as events and snapshots.

use dock::pinned::PinnedEntry;
use dock::state::DockState;
use dock::task::WindowRecord;
use test_harness::assertions::{assert_invariants, assert_order};
use test_harness::fixtures::paged_dock;
use test_harness::headless::key;
use test_harness::TestDock;

#[test]
fn first_snapshot_creates_running_task() {
    let mut tdock = TestDock::new();
    tdock.windows.set_windows(vec![WindowRecord::with_class("kitty")]);
    assert!(tdock.poll());

    let kitty = tdock.task("kitty").unwrap();
    assert!(kitty.running);
    assert!(!kitty.pinned);
    assert_order(&tdock, &["kitty"]);
}

#[test]
fn pinned_app_without_windows_survives_startup() {
    let tdock = TestDock::with_pinned(&["firefox"]);

    let firefox = tdock.task("firefox").unwrap();
    assert!(firefox.pinned);
    assert!(!firefox.running);
    assert_order(&tdock, &["firefox"]);
}

#[test]
fn close_event_then_snapshot_removes_unpinned_task() {
    let mut tdock = TestDock::new();
    let address = tdock.open("kitty");
    assert!(tdock.task("kitty").unwrap().running);

    tdock.close_window(&address);
    assert!(tdock.task("kitty").is_none());
    assert_order(&tdock, &[]);
}

#[test]
fn closing_one_of_two_windows_keeps_task() {
    let mut tdock = TestDock::new();
    let first = tdock.open("kitty");
    tdock.open("kitty");

    tdock.close_window(&first);
    assert!(tdock.task("kitty").unwrap().running);
    assert_order(&tdock, &["kitty"]);
}

#[test]
fn closing_pinned_app_keeps_it_idle() {
    let mut tdock = TestDock::with_pinned(&["firefox"]);
    let address = tdock.open("Firefox");
    assert!(tdock.task("firefox").unwrap().running);

    tdock.close_window(&address);
    let firefox = tdock.task("firefox").unwrap();
    assert!(firefox.pinned);
    assert!(!firefox.running);
    assert_order(&tdock, &["firefox"]);
}

#[test]
fn reorder_to_last_index() {
    let mut state = DockState::new();
    state.load_pinned(["a", "b", "c"].iter().map(|c| PinnedEntry::new(c, None, None)).collect());

    state.reorder(&key("a"), 2).unwrap();
    let order: Vec<&str> = state.order().keys().iter().map(|k| k.as_str()).collect();
    assert_eq!(order, vec!["b", "c", "a"]);
    assert_invariants(&state);
}

#[test]
fn pages_of_two() {
    let tdock = paged_dock(2, 5);
    let order = tdock.dock.state().order();

    let page = |i: usize| order.page(i, 2).iter().map(|k| k.as_str()).collect::<Vec<_>>();
    assert_eq!(page(0), vec!["app0", "app1"]);
    assert_eq!(page(1), vec!["app2", "app3"]);
    assert_eq!(page(2), vec!["app4"]);
    // Out of range clamps to the last page
    assert_eq!(page(9), vec!["app4"]);
}

#[test]
fn discovery_appends_after_pinned() {
    let mut tdock = TestDock::with_pinned(&["firefox", "code"]);
    tdock.open("kitty");
    tdock.open("code");
    tdock.open("mpv");

    assert_order(&tdock, &["firefox", "code", "kitty", "mpv"]);
}

#[test]
fn focus_moves_between_tasks() {
    let mut tdock = TestDock::new();
    tdock.open("kitty");
    tdock.open("firefox");

    tdock.focus("kitty");
    assert!(tdock.task("kitty").unwrap().focused);
    assert!(!tdock.task("firefox").unwrap().focused);

    tdock.focus("firefox");
    assert!(!tdock.task("kitty").unwrap().focused);
    assert!(tdock.task("firefox").unwrap().focused);

    // Snapshot agrees with the events, so nothing changes
    assert!(!tdock.poll());
}

#[test]
fn events_and_snapshots_converge() {
    let mut tdock = TestDock::with_pinned(&["firefox"]);
    tdock.open("kitty");
    tdock.open("firefox");
    let mpv = tdock.open("mpv");
    tdock.close_window(&mpv);
    tdock.focus("kitty");

    let from_events = tdock.dock.state().tasks_in_order();
    assert!(!tdock.poll(), "snapshot should agree with the event stream");
    assert_eq!(tdock.dock.state().tasks_in_order(), from_events);
    assert_order(&tdock, &["firefox", "kitty"]);
}

#[test]
fn window_manager_restart_resyncs() {
    let mut tdock = TestDock::new();
    tdock.open("kitty");
    tdock.open("firefox");

    // Everything vanished while the event channel was down
    tdock.windows.set_windows(vec![WindowRecord::with_class("foot")]);
    assert!(tdock.poll());
    assert_order(&tdock, &["foot"]);
}
