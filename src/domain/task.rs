//! Task domain model
//!
//! Tasks are trackable items with a success counter. Every task belongs to
//! exactly one list.

use serde::{Deserialize, Serialize};

use super::id::{ListId, TaskId};

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
    Done,
}

impl TaskStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Returns true if the task still shows up in the working view
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Done => "done",
        }
    }
}

/// A task within a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Trimmed, non-empty title
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Success counter
    #[serde(default)]
    pub count: u32,

    /// Owning list
    pub list_id: ListId,
}

impl Task {
    /// Creates a new active task with a zero counter
    pub fn new(id: TaskId, title: impl Into<String>, list_id: ListId) -> Self {
        Self {
            id,
            title: title.into(),
            status: TaskStatus::Active,
            count: 0,
            list_id,
        }
    }

    /// Returns true if the task is active
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if the task is done
    pub fn is_done(&self) -> bool {
        self.status.is_complete()
    }

    /// Returns true if the task belongs to the given list
    pub fn belongs_to(&self, list_id: &ListId) -> bool {
        &self.list_id == list_id
    }
}
