//! Worker dispatch and run coordination
//!
//! The dispatcher loop drains the queue and applies each command to the
//! tree under the active strategy's guard; the coordinator validates the
//! strategy/thread-count preconditions, spawns the pool, and times the
//! apply phase only (parsing and serialization are excluded from the
//! measurement).

use crate::command::queue::CommandQueue;
use crate::command::Command;
use crate::error::ConfigError;
use crate::sync::{SharedTree, StrategyKind, TreeAccess, UnsyncTree};
use crate::tree::TreeStore;
use crate::types::NodeKind;
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Options for a single run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub threads: usize,
    pub strategy: StrategyKind,
}

/// Tally of command outcomes, per worker and aggregated per run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainStats {
    /// Commands processed
    pub applied: usize,
    /// Successful creates
    pub created: usize,
    /// Successful deletes
    pub deleted: usize,
    /// Lookups that found their target
    pub found: usize,
    /// Lookups that did not
    pub not_found: usize,
    /// Creates/deletes rejected with `NotFound`/`AlreadyExists`
    pub rejected: usize,
}

impl DrainStats {
    pub fn merge(&mut self, other: &DrainStats) {
        self.applied += other.applied;
        self.created += other.created;
        self.deleted += other.deleted;
        self.found += other.found;
        self.not_found += other.not_found;
        self.rejected += other.rejected;
    }
}

/// Result of a completed run: the final tree plus the report
pub struct RunOutcome {
    pub tree: TreeStore,
    pub report: RunReport,
}

/// Apply-phase measurement and aggregated outcome counters
#[derive(Debug, Clone)]
pub struct RunReport {
    pub strategy: StrategyKind,
    pub threads: usize,
    pub elapsed: Duration,
    pub stats: DrainStats,
}

/// Per-worker dispatcher loop.
///
/// Dequeues until the queue reports empty, applying each command under the
/// guard for its access mode. The queue guard is released before the tree
/// guard is taken; neither is held when the loop returns to the queue.
/// Workers never wait: an empty queue terminates the loop.
pub fn drain_queue<T: TreeAccess>(queue: &CommandQueue, tree: &T, worker_id: usize) -> DrainStats {
    let mut stats = DrainStats::default();
    while let Some(command) = queue.dequeue() {
        apply_command(tree, &command, worker_id, &mut stats);
    }
    debug!(worker_id, applied = stats.applied, "worker drained queue");
    stats
}

fn apply_command<T: TreeAccess>(
    tree: &T,
    command: &Command,
    worker_id: usize,
    stats: &mut DrainStats,
) {
    stats.applied += 1;
    match command {
        Command::Create { path, kind } => {
            let action = match kind {
                NodeKind::File => "create file",
                NodeKind::Directory => "create directory",
            };
            match tree.with_write(|t| t.create(path, *kind)) {
                Ok(()) => {
                    stats.created += 1;
                    info!(worker_id, path = %path, "{}", action);
                }
                Err(e) => {
                    stats.rejected += 1;
                    warn!(worker_id, path = %path, error = %e, "{} failed", action);
                }
            }
        }
        Command::Lookup { path } => match tree.with_read(|t| t.lookup(path)) {
            Ok(kind) => {
                stats.found += 1;
                info!(worker_id, path = %path, kind = ?kind, "lookup: found");
            }
            Err(_) => {
                stats.not_found += 1;
                info!(worker_id, path = %path, "lookup: not found");
            }
        },
        Command::Delete { path } => match tree.with_write(|t| t.delete(path)) {
            Ok(()) => {
                stats.deleted += 1;
                info!(worker_id, path = %path, "delete");
            }
            Err(e) => {
                stats.rejected += 1;
                warn!(worker_id, path = %path, error = %e, "delete failed");
            }
        },
    }
}

/// Run the apply phase over a fully loaded queue.
///
/// Validates the strategy/thread-count preconditions, then either drains
/// single-threaded with no primitive at all (`none`) or spawns the worker
/// pool over the guarded tree. Returns the final tree and the report; the
/// elapsed measurement covers only the apply phase.
pub fn execute(queue: &CommandQueue, options: &RunOptions) -> Result<RunOutcome, ConfigError> {
    options.strategy.validate_thread_count(options.threads)?;
    info!(
        strategy = %options.strategy,
        threads = options.threads,
        pending = queue.remaining(),
        "starting apply phase"
    );

    let (tree, stats, elapsed) = match options.strategy {
        StrategyKind::None => {
            let access = UnsyncTree::new(TreeStore::new());
            let started = Instant::now();
            let stats = drain_queue(queue, &access, 0);
            (access.into_inner(), stats, started.elapsed())
        }
        StrategyKind::Exclusive | StrategyKind::ReadWrite => {
            let shared = match options.strategy {
                StrategyKind::Exclusive => SharedTree::exclusive(TreeStore::new()),
                _ => SharedTree::read_write(TreeStore::new()),
            };
            let started = Instant::now();
            let stats = thread::scope(|scope| {
                let shared = &shared;
                let handles: Vec<_> = (0..options.threads)
                    .map(|worker_id| scope.spawn(move || drain_queue(queue, shared, worker_id)))
                    .collect();
                let mut total = DrainStats::default();
                for handle in handles {
                    match handle.join() {
                        Ok(stats) => total.merge(&stats),
                        // A worker panic is an invariant violation; abort the run
                        Err(payload) => std::panic::resume_unwind(payload),
                    }
                }
                total
            });
            (shared.into_inner(), stats, started.elapsed())
        }
    };

    debug_assert_eq!(queue.remaining(), 0);
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        applied = stats.applied,
        "apply phase complete"
    );

    Ok(RunOutcome {
        tree,
        report: RunReport {
            strategy: options.strategy,
            threads: options.threads,
            elapsed,
            stats,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::load_script;
    use std::io::Cursor;

    fn loaded_queue(script: &str) -> CommandQueue {
        let queue = CommandQueue::new();
        load_script(Cursor::new(script), &queue).unwrap();
        queue
    }

    #[test]
    fn test_none_strategy_requires_single_thread() {
        let queue = CommandQueue::new();
        let err = execute(
            &queue,
            &RunOptions {
                threads: 2,
                strategy: StrategyKind::None,
            },
        );
        assert!(matches!(err, Err(ConfigError::ThreadCountForNone(2))));
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        let queue = CommandQueue::new();
        let err = execute(
            &queue,
            &RunOptions {
                threads: 0,
                strategy: StrategyKind::Exclusive,
            },
        );
        assert!(matches!(err, Err(ConfigError::ZeroThreads)));
    }

    #[test]
    fn test_sequential_run_tallies_outcomes() {
        let queue = loaded_queue("c /a d\nc /a/b f\nl /a/b\nl /nope\nc /a d\nd /a\nd /a\n");
        let outcome = execute(
            &queue,
            &RunOptions {
                threads: 1,
                strategy: StrategyKind::None,
            },
        )
        .unwrap();

        let stats = outcome.report.stats;
        assert_eq!(stats.applied, 7);
        assert_eq!(stats.created, 2);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.found, 1);
        assert_eq!(stats.not_found, 1);
        assert_eq!(stats.rejected, 2);
        assert_eq!(outcome.tree.render(), "/\n");
        assert_eq!(queue.remaining(), 0);
    }

    #[test]
    fn test_failed_commands_do_not_affect_later_ones() {
        let queue = loaded_queue("c /a/b f\nc /a d\nc /a/b f\nl /a/b\n");
        let outcome = execute(
            &queue,
            &RunOptions {
                threads: 1,
                strategy: StrategyKind::None,
            },
        )
        .unwrap();

        assert_eq!(outcome.report.stats.rejected, 1);
        assert_eq!(outcome.tree.render(), "/\n  a/\n    b\n");
    }

    #[test]
    fn test_multi_threaded_run_drains_queue_exactly_once() {
        let mut script = String::new();
        for i in 0..500 {
            script.push_str(&format!("c /n{} f\n", i));
        }
        let queue = loaded_queue(&script);
        let outcome = execute(
            &queue,
            &RunOptions {
                threads: 4,
                strategy: StrategyKind::Exclusive,
            },
        )
        .unwrap();

        assert_eq!(outcome.report.stats.applied, 500);
        assert_eq!(outcome.report.stats.created, 500);
        assert_eq!(outcome.report.stats.rejected, 0);
        assert_eq!(queue.remaining(), 0);
    }
}
