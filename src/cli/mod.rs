//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Task | Tasks and counters | `task add`, `task inc`, `task done`, `task move` |
//! | List | List management | `list new`, `list use`, `list rename` |
//! | Backup | Whole-document backups | `backup export`, `backup import` |
//! | Share | Sharing service | `share publish`, `share search`, `share import` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logging on stderr:
//! ```bash
//! tally --verbose task list
//! ```
//!
//! Rejected changes (duplicate names, unknown ids, deleting the last list)
//! exit with an error.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod task;
mod list;
mod backup;
mod share;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
