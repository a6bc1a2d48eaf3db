//! Treebench: In-Memory Filesystem Lock-Strategy Simulator
//!
//! Replays a script of create/lookup/delete commands against an in-memory
//! hierarchical namespace, either single-threaded or from a pool of worker
//! threads, under a configurable locking strategy, and measures the
//! wall-clock cost of the apply phase.

pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod sync;
pub mod tooling;
pub mod tree;
pub mod types;
