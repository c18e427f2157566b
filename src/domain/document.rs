//! The full task-manager state
//!
//! A [`Document`] holds every list and task plus the current list selection.
//! Engine operations never mutate a document in place: they take `&self`
//! and return an [`Outcome`] carrying the next document and whether
//! anything changed.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::id::{ListId, TaskId};
use super::list::TaskList;
use super::task::Task;

/// Current schema version of persisted documents
pub const SCHEMA_VERSION: u32 = 2;

/// Id of the empty default list written before onboarding content existed
pub const DEFAULT_LIST_ID: &str = "list-default";

/// Id of the list every fresh document starts with
///
/// Distinct from [`DEFAULT_LIST_ID`] so an onboarding list the user has
/// emptied is never taken for the legacy empty state.
pub const ONBOARDING_LIST_ID: &str = "list-onboarding";

/// Name of the list every fresh document starts with
pub const DEFAULT_LIST_NAME: &str = "Task list";

const ONBOARDING_TASKS: [(&str, &str); 4] = [
    ("onboarding-1", "Add a task you want to practice with the + button"),
    ("onboarding-2", "Press +1 every time you pull it off"),
    ("onboarding-3", "Mark a task done once it sticks; restore it any time"),
    ("onboarding-4", "Create more lists from the list menu"),
];

/// Returns current timestamp in milliseconds since epoch
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Persisted state: lists, tasks and the current list selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub schema_version: u32,
    pub current_list_id: ListId,
    pub lists: Vec<TaskList>,
    pub tasks: Vec<Task>,
}

/// Result of an engine operation
///
/// `changed` is false when the operation was rejected or had nothing to do;
/// the document is then equal to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub document: Document,
    pub changed: bool,
}

impl Outcome {
    /// An outcome that keeps the given document
    pub fn unchanged(document: &Document) -> Self {
        Self {
            document: document.clone(),
            changed: false,
        }
    }

    /// An outcome with a new document
    pub fn changed(document: Document) -> Self {
        Self {
            document,
            changed: true,
        }
    }

    /// Builds an outcome by comparing against the previous document
    pub fn compare(before: &Document, after: Document) -> Self {
        let changed = &after != before;
        Self {
            document: after,
            changed,
        }
    }

    /// Unwraps the document, discarding the change flag
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl Document {
    /// Creates a document with the given lists and tasks at the current schema version
    pub fn new(current_list_id: ListId, lists: Vec<TaskList>, tasks: Vec<Task>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            current_list_id,
            lists,
            tasks,
        }
    }

    /// The onboarding document used on first run and after unrecoverable loads
    pub fn initial() -> Self {
        let list_id = ListId::from(ONBOARDING_LIST_ID);
        let tasks = ONBOARDING_TASKS
            .iter()
            .map(|(id, title)| Task::new(TaskId::from(*id), *title, list_id.clone()))
            .collect();

        Self::new(
            list_id.clone(),
            vec![TaskList::new(list_id, DEFAULT_LIST_NAME, 0)],
            tasks,
        )
    }

    /// Returns true for the pre-onboarding empty state: one empty list with
    /// the legacy default id and name
    pub fn is_legacy_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.lists.len() == 1
            && self.lists[0].id.as_str() == DEFAULT_LIST_ID
            && self.lists[0].name == DEFAULT_LIST_NAME
    }

    /// Looks up a list by id
    pub fn list(&self, list_id: &ListId) -> Option<&TaskList> {
        self.lists.iter().find(|list| &list.id == list_id)
    }

    /// Returns true if a list with this id exists
    pub fn has_list(&self, list_id: &ListId) -> bool {
        self.list(list_id).is_some()
    }

    /// Looks up a list by exact name
    pub fn list_by_name(&self, name: &str) -> Option<&TaskList> {
        self.lists.iter().find(|list| list.name == name)
    }

    /// The current list, falling back to the first list
    pub fn current_list(&self) -> Option<&TaskList> {
        self.list(&self.current_list_id).or_else(|| self.lists.first())
    }

    /// Looks up a task by id
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    /// Ids of all lists
    pub fn list_ids(&self) -> HashSet<&ListId> {
        self.lists.iter().map(|list| &list.id).collect()
    }

    /// Returns a copy with missing pieces defaulted
    ///
    /// - an empty list collection is replaced by the onboarding list
    /// - a dangling current list falls back to the first list
    /// - tasks pointing at unknown lists are re-homed to the current list
    pub fn normalized(&self) -> Self {
        let mut doc = self.clone();
        doc.schema_version = SCHEMA_VERSION;

        if doc.lists.is_empty() {
            let initial = Self::initial();
            doc.lists = initial.lists;
            doc.current_list_id = initial.current_list_id;
        }

        if !doc.has_list(&doc.current_list_id) {
            doc.current_list_id = doc.lists[0].id.clone();
        }

        let known: HashSet<ListId> = doc.lists.iter().map(|list| list.id.clone()).collect();
        let fallback = doc.current_list_id.clone();
        for task in &mut doc.tasks {
            if !known.contains(&task.list_id) {
                task.list_id = fallback.clone();
            }
        }

        doc
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_deterministic() {
        assert_eq!(Document::initial(), Document::initial());
    }

    #[test]
    fn initial_state_has_one_list_with_onboarding_tasks() {
        let doc = Document::initial();

        assert_eq!(doc.schema_version, SCHEMA_VERSION);
        assert_eq!(doc.lists.len(), 1);
        assert_eq!(doc.current_list_id.as_str(), ONBOARDING_LIST_ID);
        assert_eq!(doc.tasks.len(), ONBOARDING_TASKS.len());
        assert!(doc.tasks.iter().all(|t| t.list_id == doc.current_list_id));
        assert!(!doc.is_legacy_empty());
    }

    #[test]
    fn legacy_empty_detection() {
        let legacy_id = ListId::from(DEFAULT_LIST_ID);
        let mut doc = Document::new(
            legacy_id.clone(),
            vec![TaskList::new(legacy_id, DEFAULT_LIST_NAME, 1)],
            vec![],
        );
        assert!(doc.is_legacy_empty());

        doc.lists[0].name = "Renamed".to_string();
        assert!(!doc.is_legacy_empty());
    }

    #[test]
    fn emptied_onboarding_list_is_not_legacy() {
        let mut doc = Document::initial();
        doc.tasks.clear();

        assert!(!doc.is_legacy_empty());
    }

    #[test]
    fn normalized_fills_missing_lists() {
        let doc = Document::new(ListId::from("gone"), vec![], vec![]);
        let normalized = doc.normalized();

        assert_eq!(normalized.lists.len(), 1);
        assert_eq!(normalized.current_list_id.as_str(), ONBOARDING_LIST_ID);
    }

    #[test]
    fn normalized_rehomes_dangling_tasks() {
        let doc = Document::new(
            ListId::from("missing"),
            vec![TaskList::new(ListId::from("l1"), "L1", 1)],
            vec![Task::new(TaskId::from("t1"), "A", ListId::from("nowhere"))],
        );
        let normalized = doc.normalized();

        assert_eq!(normalized.current_list_id.as_str(), "l1");
        assert_eq!(normalized.tasks[0].list_id.as_str(), "l1");
    }

    #[test]
    fn outcome_compare_detects_change() {
        let doc = Document::initial();
        assert!(!Outcome::compare(&doc, doc.clone()).changed);

        let mut next = doc.clone();
        next.tasks.pop();
        assert!(Outcome::compare(&doc, next).changed);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let json = serde_json::to_value(Document::initial()).unwrap();

        assert_eq!(json["schemaVersion"], 2);
        assert_eq!(json["currentListId"], ONBOARDING_LIST_ID);
        assert!(json["lists"].is_array());
        assert!(json["tasks"].is_array());
    }
}
