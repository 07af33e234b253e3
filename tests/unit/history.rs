use std::time::{Duration, Instant};

use super::*;

#[test]
fn push_truncates_redo_branch() {
    let mut log = HistoryLog::new(0);
    log.push(1);
    log.push(2);
    assert!(log.undo());
    assert!(log.undo());
    assert_eq!(*log.current(), 0);
    assert!(log.can_redo());

    assert!(log.push(7));
    assert!(!log.can_redo());
    assert_eq!(log.len(), 2);
    assert_eq!(*log.current(), 7);
}

#[test]
fn push_equal_to_top_is_a_no_op() {
    let mut log = HistoryLog::new("a".to_string());
    assert!(log.push("b".to_string()));
    assert!(!log.push("b".to_string()));
    assert_eq!(log.len(), 2);
    assert_eq!(log.cursor(), 1);
}

#[test]
fn push_equal_to_cursor_after_undo_keeps_redo() {
    let mut log = HistoryLog::new(1);
    log.push(2);
    log.undo();
    assert!(!log.push(1));
    assert!(log.can_redo());
    assert_eq!(log.len(), 2);
}

#[test]
fn undo_redo_round_trip_for_every_prefix() {
    let mut log = HistoryLog::new(0);
    for v in 1..=6 {
        log.push(v);
        let before = *log.current();
        assert!(log.undo());
        assert!(log.redo());
        assert_eq!(*log.current(), before);
        assert!(!log.can_redo());
    }
}

#[test]
fn boundaries_are_no_ops() {
    let mut log = HistoryLog::new(3);
    assert!(!log.undo());
    assert!(!log.redo());
    assert_eq!(log.cursor(), 0);
    assert!(!log.is_empty());
}

#[test]
fn reset_replaces_everything() {
    let mut log = HistoryLog::new(0);
    log.push(1);
    log.push(2);
    log.undo();
    log.reset(9);
    assert_eq!(log.len(), 1);
    assert_eq!(log.cursor(), 0);
    assert_eq!(*log.current(), 9);
    assert!(!log.can_undo());
    assert!(!log.can_redo());
}

#[test]
fn working_state_only_commits_on_request() {
    let mut ws = WorkingState::new(10);
    for v in 11..20 {
        ws.set(v);
    }
    assert_eq!(*ws.get(), 19);
    assert_eq!(*ws.committed(), 10);
    assert_eq!(ws.log().len(), 1);
    assert!(ws.is_dirty());

    assert!(ws.commit());
    assert_eq!(ws.log().len(), 2);
    assert!(!ws.is_dirty());
    assert!(!ws.commit());
}

#[test]
fn working_state_undo_resyncs_working_copy() {
    let mut ws = WorkingState::new(0);
    ws.set_and_commit(1);
    ws.set(5);
    assert!(ws.undo());
    assert_eq!(*ws.get(), 0);
    assert!(ws.redo());
    assert_eq!(*ws.get(), 1);

    ws.update(|v| *v += 1);
    assert_eq!(*ws.get(), 2);
    ws.reset(42);
    assert_eq!(*ws.get(), 42);
    assert!(!ws.can_undo());
}

#[test]
fn undo_at_boundary_discards_uncommitted_changes() {
    let mut ws = WorkingState::new(0);
    ws.set(3);
    assert!(!ws.undo());
    assert_eq!(*ws.get(), 0);
}

#[test]
fn debounce_fires_once_after_last_schedule() {
    let t0 = Instant::now();
    let mut d = DebouncedCommit::new(Duration::from_millis(500));
    d.schedule(t0);
    d.schedule(t0 + Duration::from_millis(300));
    assert!(!d.poll(t0 + Duration::from_millis(600)));
    assert!(d.is_pending());
    assert!(d.poll(t0 + Duration::from_millis(800)));
    assert!(!d.poll(t0 + Duration::from_millis(900)));
    assert!(!d.is_pending());
}

#[test]
fn debounce_cancel_drops_pending_commit() {
    let t0 = Instant::now();
    let mut d = DebouncedCommit::new(Duration::from_millis(500));
    d.schedule(t0);
    d.cancel();
    assert!(!d.poll(t0 + Duration::from_secs(1)));
    assert_eq!(d.delay(), Duration::from_millis(500));
}
