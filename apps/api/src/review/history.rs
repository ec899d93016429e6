use std::collections::VecDeque;

/// Number of snapshots kept on each stack.
pub const HISTORY_CAPACITY: usize = 50;

/// Two-stack undo/redo history over owned snapshots.
///
/// Both stacks are bounded; pushing past capacity drops the oldest snapshot.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: VecDeque<T>,
    capacity: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

fn push_bounded<T>(stack: &mut VecDeque<T>, item: T, capacity: usize) {
    if capacity == 0 {
        return;
    }
    while stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(item);
}

impl<T> History<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(capacity),
            future: VecDeque::new(),
            capacity,
        }
    }

    /// Records the state before a mutation and invalidates the redo stack.
    pub fn push(&mut self, snapshot: T) {
        push_bounded(&mut self.past, snapshot, self.capacity);
        self.future.clear();
    }

    /// Steps back: stores `current` for redo and returns the previous snapshot.
    ///
    /// Returns `None` and leaves both stacks untouched when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.past.pop_back()?;
        push_bounded(&mut self.future, current, self.capacity);
        Some(previous)
    }

    /// Steps forward: stores `current` for undo and returns the next snapshot.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.future.pop_back()?;
        push_bounded(&mut self.past, current, self.capacity);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }
}
