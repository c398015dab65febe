//! Snapshot undo history and the latch that folds a gesture into one entry.

use std::collections::VecDeque;

use tracing::debug;

/// Default undo limit.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Bounded undo/redo stacks of whole-state snapshots.
///
/// Each entry is the state *before* a change. Recording can be paused, in
/// which case writes go through without producing entries.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
    max_depth: usize,
    tracking: bool,
}

impl<T> History<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            tracking: true,
        }
    }

    /// Push the pre-change state. Returns `false` while paused.
    pub fn record(&mut self, previous: T) -> bool {
        if !self.tracking {
            return false;
        }
        self.redo_stack.clear();
        self.undo_stack.push_back(previous);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        true
    }

    /// Swap `current` for the last recorded state.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Swap `current` for the last undone state.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn pause(&mut self) {
        self.tracking = false;
    }

    pub fn resume(&mut self) {
        self.tracking = true;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Reference-counted interaction session over a [`History`].
///
/// The first write inside the outermost session is recorded, then
/// recording pauses until the last session ends. Sessions nest.
#[derive(Debug, Clone, Default)]
pub struct InteractionLatch {
    depth: u32,
    latched: bool,
}

impl InteractionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<T>(&mut self, history: &mut History<T>) {
        if self.depth == 0 {
            self.latched = false;
            history.resume();
        }
        self.depth += 1;
    }

    /// Record `previous` as the state before a write, honoring the latch.
    pub fn record<T>(&mut self, history: &mut History<T>, previous: T) -> bool {
        let recorded = history.record(previous);
        if self.depth > 0 && !self.latched {
            history.pause();
            self.latched = true;
            debug!(depth = self.depth, "latched interaction into history");
        }
        recorded
    }

    /// Apply `f` to `state`, recording the prior snapshot if it changed.
    pub fn mutate<T, F>(&mut self, history: &mut History<T>, state: &mut T, f: F) -> bool
    where
        T: Clone + PartialEq,
        F: FnOnce(&mut T),
    {
        let previous = state.clone();
        f(state);
        if *state == previous {
            return false;
        }
        self.record(history, previous);
        true
    }

    /// Close one session. Unbalanced calls are ignored.
    pub fn end<T>(&mut self, history: &mut History<T>) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.latched = false;
            history.resume();
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }
}
