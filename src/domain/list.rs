//! List domain model
//!
//! Lists are named groupings that own tasks. Names are unique within a
//! document (exact, case-sensitive match).

use serde::{Deserialize, Serialize};

use super::id::ListId;

/// A user-created list of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    /// Unique identifier
    pub id: ListId,

    /// Display name, unique among lists
    pub name: String,

    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,

    /// Creation timestamp in milliseconds, used for ordering only
    #[serde(default)]
    pub created_at: i64,
}

impl TaskList {
    /// Creates a list with an empty description
    pub fn new(id: ListId, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            created_at,
        }
    }

    /// Sets the description (builder style)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_description_defaults_to_empty() {
        let list: TaskList = serde_json::from_str(r#"{"id":"l1","name":"L1","createdAt":1}"#).unwrap();

        assert_eq!(list.description, "");
        assert_eq!(list.created_at, 1);
    }

    #[test]
    fn serializes_all_fields() {
        let list = TaskList::new(ListId::from("l1"), "L1", 5).with_description("notes");
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": "l1", "name": "L1", "description": "notes", "createdAt": 5})
        );
    }
}
