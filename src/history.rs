//! Linear undo/redo over immutable snapshots, and the live/committed split built on top of it.
//!
//! Continuous gestures (drags, pinches, slider moves) mutate a [`WorkingState`]'s transient copy
//! through [`WorkingState::set`]; only gesture ends call [`WorkingState::commit`]. The history
//! itself never observes intermediate values.

use std::time::{Duration, Instant};

/// Ordered snapshots with a cursor. `0 <= cursor < snapshots.len()` always holds.
#[derive(Clone, Debug)]
pub struct HistoryLog<T> {
    snapshots: Vec<T>,
    cursor: usize,
}

impl<T: Clone + PartialEq> HistoryLog<T> {
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Drop the redo branch and append `state`, unless it equals the current snapshot.
    ///
    /// Returns `false` for the no-op case, which leaves the log (redo branch included) untouched.
    pub fn push(&mut self, state: T) -> bool {
        if self.current() == &state {
            return false;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state);
        self.cursor = self.snapshots.len() - 1;
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Replace the whole log with a single snapshot.
    pub fn reset(&mut self, state: T) {
        self.snapshots.clear();
        self.snapshots.push(state);
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always `false`; a log holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// A [`HistoryLog`] plus the transient value currently being rendered.
///
/// Undo, redo and reset resynchronize the working copy with the snapshot under the cursor, so
/// consumers only ever read [`WorkingState::get`].
#[derive(Clone, Debug)]
pub struct WorkingState<T> {
    log: HistoryLog<T>,
    working: T,
}

impl<T: Clone + PartialEq> WorkingState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            working: initial.clone(),
            log: HistoryLog::new(initial),
        }
    }

    /// Value to render right now (possibly uncommitted).
    pub fn get(&self) -> &T {
        &self.working
    }

    /// Last committed snapshot under the history cursor.
    pub fn committed(&self) -> &T {
        self.log.current()
    }

    /// Live update; history is untouched.
    pub fn set(&mut self, value: T) {
        self.working = value;
    }

    /// Live update in place; history is untouched.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.working);
    }

    /// Push the working copy as a new snapshot. Returns `false` when it equals the current one.
    pub fn commit(&mut self) -> bool {
        let pushed = self.log.push(self.working.clone());
        if pushed {
            tracing::debug!(len = self.log.len(), "history commit");
        }
        pushed
    }

    /// Update and commit in one step, for discrete controls (toggles, pickers, steppers).
    pub fn set_and_commit(&mut self, value: T) -> bool {
        self.working = value;
        self.commit()
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.log.undo();
        self.working = self.log.current().clone();
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.log.redo();
        self.working = self.log.current().clone();
        moved
    }

    /// Discard all history and start over from `value`.
    pub fn reset(&mut self, value: T) {
        self.log.reset(value.clone());
        self.working = value;
        tracing::debug!("history reset");
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    /// `true` while the working copy differs from the committed snapshot.
    pub fn is_dirty(&self) -> bool {
        &self.working != self.log.current()
    }

    pub fn log(&self) -> &HistoryLog<T> {
        &self.log
    }
}

/// Cancel-and-reschedule timer for commits after a burst of discrete inputs.
///
/// The host event loop owns the clock and passes `now` in; nothing here sleeps or spawns.
#[derive(Clone, Debug)]
pub struct DebouncedCommit {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebouncedCommit {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Replace any pending deadline with `now + delay`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
#[path = "../tests/unit/history.rs"]
mod tests;
