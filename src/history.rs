//! Linear undo/redo over immutable snapshots.
//!
//! `past` is oldest first, `future` is nearest-redo first. Recording a new
//! value drops any redo history.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState<T> {
    past: Vec<T>,
    present: T,
    future: VecDeque<T>,
}

impl<T> HistoryState<T> {
    pub fn new(initial: T) -> Self {
        Self { past: Vec::new(), present: initial, future: VecDeque::new() }
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past(&self) -> &[T] {
        &self.past
    }

    /// Redo candidates, nearest first.
    pub fn future(&self) -> impl Iterator<Item = &T> {
        self.future.iter()
    }

    /// Make `new_present` current, pushing the old value onto `past`.
    pub fn record(mut self, new_present: T) -> Self {
        let old = std::mem::replace(&mut self.present, new_present);
        self.past.push(old);
        self.future.clear();
        self
    }

    /// Step back one snapshot. No-op when there is nothing to undo.
    pub fn undo(mut self) -> Self {
        if let Some(previous) = self.past.pop() {
            let current = std::mem::replace(&mut self.present, previous);
            self.future.push_front(current);
        }
        self
    }

    /// Step forward one snapshot. No-op when there is nothing to redo.
    pub fn redo(mut self) -> Self {
        if let Some(next) = self.future.pop_front() {
            let current = std::mem::replace(&mut self.present, next);
            self.past.push(current);
        }
        self
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Replace everything with a single snapshot, e.g. after loading another chart.
    pub fn reset(self, present: T) -> Self {
        Self::new(present)
    }
}
