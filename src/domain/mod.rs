//! Domain models for Tally
//!
//! Contains the state-transition and merge engine without any I/O concerns.

mod id;
mod task;
mod list;
mod document;
mod tasks;
mod lists;
mod merge;

pub use id::{new_id, unique_id, IdError, ListId, TaskId};
pub use task::{Task, TaskStatus};
pub use list::TaskList;
pub use document::{
    current_timestamp, Document, Outcome, DEFAULT_LIST_ID, DEFAULT_LIST_NAME,
    ONBOARDING_LIST_ID, SCHEMA_VERSION,
};
pub use merge::{
    merge_imported_state, merge_imported_state_at, unique_name, MergeResult,
    IMPORTED_LIST_PLACEHOLDER,
};
