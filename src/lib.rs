//! Tally - local-first task lists with counters
//!
//! Tasks live in named lists inside a single versioned document. Every
//! change goes through a pure engine (`domain`) that returns a new
//! document; `storage` persists it, migrates old schema versions and
//! merges backups; `share` publishes single lists to a remote service.

pub mod domain;
pub mod storage;
pub mod share;
pub mod cli;

pub use domain::{Document, ListId, Outcome, Task, TaskId, TaskList, TaskStatus};
