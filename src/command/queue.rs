//! Command Queue
//!
//! Bounded FIFO buffer of parsed commands, filled once by the parser and
//! drained concurrently by the worker pool. Delivery is exactly-once: the
//! internal cursor sits behind a single small mutex, a critical section
//! independent of (and never nested inside) the tree lock.

use super::Command;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Fixed maximum command count for a run unless overridden
pub const DEFAULT_CAPACITY: usize = 150_000;

/// Bounded, ordered buffer of parsed commands
pub struct CommandQueue {
    state: Mutex<VecDeque<Command>>,
    capacity: usize,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Append a command at the tail.
    ///
    /// Returns `false` once the fixed maximum is reached; the upstream
    /// parser stops admitting commands for the run.
    pub fn enqueue(&self, command: Command) -> bool {
        let mut state = self.state.lock();
        if state.len() >= self.capacity {
            return false;
        }
        state.push_back(command);
        true
    }

    /// Remove and return the head command, or `None` if the queue is empty.
    ///
    /// Safe for concurrent callers: exactly one caller receives any given
    /// command. Never blocks waiting for new commands.
    pub fn dequeue(&self) -> Option<Command> {
        self.state.lock().pop_front()
    }

    /// Count of commands not yet delivered
    pub fn remaining(&self) -> usize {
        self.state.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
