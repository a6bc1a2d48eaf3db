//! Locking strategies for the shared namespace tree
//!
//! The tree is the only shared mutable resource in a run. Access goes
//! through the [`TreeAccess`] capability, whose closure-scoped guards make
//! lock release deterministic on every exit path, including command
//! failures. No guard outlives the closure, so no lock is ever held across
//! two command applications or while touching the queue.

use crate::error::ConfigError;
use crate::tree::TreeStore;
use clap::ValueEnum;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// Synchronization discipline protecting tree access, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// No synchronization primitive; requires exactly one worker
    None,
    /// One global mutex; every access is exclusive
    Exclusive,
    /// Global read-write lock; lookups share, mutations exclude
    ReadWrite,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::None => "none",
            StrategyKind::Exclusive => "exclusive",
            StrategyKind::ReadWrite => "read-write",
        };
        f.write_str(name)
    }
}

impl StrategyKind {
    /// Validate the worker count precondition for this strategy
    pub fn validate_thread_count(self, threads: usize) -> Result<(), ConfigError> {
        match self {
            StrategyKind::None if threads != 1 => Err(ConfigError::ThreadCountForNone(threads)),
            _ if threads == 0 => Err(ConfigError::ZeroThreads),
            _ => Ok(()),
        }
    }
}

/// Capability for running a closure against the tree under the active
/// strategy's guard for the requested access mode
pub trait TreeAccess {
    fn with_read<R>(&self, f: impl FnOnce(&TreeStore) -> R) -> R;
    fn with_write<R>(&self, f: impl FnOnce(&mut TreeStore) -> R) -> R;
}

/// Unsynchronized access for the single-threaded path.
///
/// Carries no lock at all; `RefCell` keeps it `!Sync`, so handing it to a
/// second thread is a compile error rather than a data race.
pub struct UnsyncTree {
    tree: RefCell<TreeStore>,
}

impl UnsyncTree {
    pub fn new(tree: TreeStore) -> Self {
        Self {
            tree: RefCell::new(tree),
        }
    }

    pub fn into_inner(self) -> TreeStore {
        self.tree.into_inner()
    }
}

impl TreeAccess for UnsyncTree {
    fn with_read<R>(&self, f: impl FnOnce(&TreeStore) -> R) -> R {
        f(&self.tree.borrow())
    }

    fn with_write<R>(&self, f: impl FnOnce(&mut TreeStore) -> R) -> R {
        f(&mut self.tree.borrow_mut())
    }
}

/// Tree behind the selected global lock primitive
pub enum SharedTree {
    Exclusive(Mutex<TreeStore>),
    ReadWrite(RwLock<TreeStore>),
}

impl SharedTree {
    pub fn exclusive(tree: TreeStore) -> Self {
        SharedTree::Exclusive(Mutex::new(tree))
    }

    pub fn read_write(tree: TreeStore) -> Self {
        SharedTree::ReadWrite(RwLock::new(tree))
    }

    /// Tear down the lock primitive and reclaim the tree
    pub fn into_inner(self) -> TreeStore {
        match self {
            SharedTree::Exclusive(mutex) => mutex.into_inner(),
            SharedTree::ReadWrite(rwlock) => rwlock.into_inner(),
        }
    }
}

impl TreeAccess for SharedTree {
    fn with_read<R>(&self, f: impl FnOnce(&TreeStore) -> R) -> R {
        match self {
            // A mutex has no shared mode; reads are exclusive too
            SharedTree::Exclusive(mutex) => f(&mutex.lock()),
            SharedTree::ReadWrite(rwlock) => f(&rwlock.read()),
        }
    }

    fn with_write<R>(&self, f: impl FnOnce(&mut TreeStore) -> R) -> R {
        match self {
            SharedTree::Exclusive(mutex) => f(&mut mutex.lock()),
            SharedTree::ReadWrite(rwlock) => f(&mut rwlock.write()),
        }
    }
}
