//! Versioned document schema
//!
//! Stored and exported documents carry a `schemaVersion` tag:
//!
//! | Version | Shape |
//! |---------|-------|
//! | 1 | `{schemaVersion, tasks}` with no lists |
//! | 2 | `{schemaVersion, currentListId, lists, tasks}` |
//!
//! [`VersionedDocument::detect`] turns untyped JSON into one of the two
//! shapes, validating version 2 structurally. [`VersionedDocument::into_current`]
//! migrates version 1 and upgrades the legacy empty state.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{Document, ListId, Task, TaskId, TaskList, TaskStatus, SCHEMA_VERSION};

/// Structural validation failures
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(String),

    #[error("'{0}' must be an array")]
    NotAnArray(&'static str),

    #[error("currentListId must be a non-empty string")]
    MissingCurrentList,

    #[error("currentListId '{0}' does not match any list")]
    UnknownCurrentList(String),

    #[error("list #{index} is invalid: {reason}")]
    InvalidList { index: usize, reason: String },

    #[error("task #{index} is invalid: {reason}")]
    InvalidTask { index: usize, reason: String },

    #[error("task '{task}' references unknown list '{list}'")]
    DanglingTask { task: String, list: String },
}

/// A task as stored by schema version 1
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct V1Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub count: u32,
}

/// Schema version 1: a flat task collection
#[derive(Debug, Clone, PartialEq)]
pub struct V1Document {
    pub tasks: Vec<V1Task>,
}

/// A document in one of the supported schema versions
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedDocument {
    V1(V1Document),
    V2(Document),
}

impl VersionedDocument {
    /// Classifies and validates an untyped payload
    pub fn detect(payload: &Value) -> Result<Self, SchemaError> {
        let object = payload.as_object().ok_or(SchemaError::NotAnObject)?;

        let is_v1 = object.get("schemaVersion").and_then(Value::as_u64) == Some(1);
        if is_v1 {
            if let Some(tasks) = object.get("tasks").and_then(Value::as_array) {
                return parse_v1(tasks).map(VersionedDocument::V1);
            }
        }

        validate(object).map(VersionedDocument::V2)
    }

    /// Converts to the current schema
    ///
    /// Version 1 is migrated into the onboarding list. A version 2 document
    /// that is exactly one empty default list is the pre-onboarding empty
    /// state and becomes the onboarding document.
    pub fn into_current(self) -> Document {
        match self {
            VersionedDocument::V1(v1) => migrate(v1),
            VersionedDocument::V2(doc) if doc.is_legacy_empty() => Document::initial(),
            VersionedDocument::V2(doc) => doc.normalized(),
        }
    }
}

/// Re-homes every version 1 task under the onboarding list
pub fn migrate(v1: V1Document) -> Document {
    let initial = Document::initial();
    let list_id = initial.current_list_id.clone();
    let tasks = v1
        .tasks
        .into_iter()
        .map(|task| Task {
            id: task.id,
            title: task.title,
            status: task.status,
            count: task.count,
            list_id: list_id.clone(),
        })
        .collect();

    Document::new(list_id, initial.lists, tasks)
}

fn parse_v1(tasks: &[Value]) -> Result<V1Document, SchemaError> {
    let tasks = tasks
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value::<V1Task>(raw.clone()).map_err(|e| SchemaError::InvalidTask {
                index,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(V1Document { tasks })
}

/// Validates a version 2 payload
///
/// Every task must reference a listed list: one dangling task invalidates
/// the whole document.
pub fn validate(object: &Map<String, Value>) -> Result<Document, SchemaError> {
    match object.get("schemaVersion") {
        Some(v) if v.as_u64() == Some(u64::from(SCHEMA_VERSION)) => {}
        Some(other) => return Err(SchemaError::UnsupportedVersion(other.to_string())),
        None => return Err(SchemaError::UnsupportedVersion("missing".to_string())),
    }

    let raw_tasks = object
        .get("tasks")
        .and_then(Value::as_array)
        .ok_or(SchemaError::NotAnArray("tasks"))?;
    let raw_lists = object
        .get("lists")
        .and_then(Value::as_array)
        .ok_or(SchemaError::NotAnArray("lists"))?;

    let current = object
        .get("currentListId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(SchemaError::MissingCurrentList)?;

    let lists = raw_lists
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            parse_list(raw).map_err(|reason| SchemaError::InvalidList { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let known: HashSet<&str> = lists.iter().map(|list| list.id.as_str()).collect();
    if !known.contains(current) {
        return Err(SchemaError::UnknownCurrentList(current.to_string()));
    }

    let mut tasks = Vec::with_capacity(raw_tasks.len());
    for (index, raw) in raw_tasks.iter().enumerate() {
        let task = parse_task(raw).map_err(|reason| SchemaError::InvalidTask { index, reason })?;
        if !known.contains(task.list_id.as_str()) {
            return Err(SchemaError::DanglingTask {
                task: task.id.to_string(),
                list: task.list_id.to_string(),
            });
        }
        tasks.push(task);
    }

    Ok(Document::new(ListId::from(current), lists, tasks))
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a str, String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("'{}' must be a non-empty string", field))
}

fn parse_list(raw: &Value) -> Result<TaskList, String> {
    let object = raw.as_object().ok_or("not an object")?;
    let id = non_empty_str(object, "id")?;
    let name = non_empty_str(object, "name")?;

    let description = match object.get("description") {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err("'description' must be a string".to_string()),
    };

    let created_at = match object.get("createdAt") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(_) => return Err("'createdAt' must be a number".to_string()),
    };

    Ok(TaskList {
        id: ListId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        created_at,
    })
}

fn parse_task(raw: &Value) -> Result<Task, String> {
    let object = raw.as_object().ok_or("not an object")?;
    non_empty_str(object, "id")?;
    non_empty_str(object, "listId")?;
    serde_json::from_value(raw.clone()).map_err(|e| e.to_string())
}
