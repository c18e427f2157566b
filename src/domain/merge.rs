//! Additive merge of an imported document
//!
//! Imported lists and tasks are appended under fresh ids and unique names.
//! Existing lists and tasks are never renamed, reordered or removed, so an
//! import can't lose data and always yields distinguishable lists.

use std::collections::{HashMap, HashSet};

use super::document::{current_timestamp, Document};
use super::id::{unique_id, ListId, TaskId};
use super::list::TaskList;
use super::task::Task;

/// Name given to imported lists whose name is blank
pub const IMPORTED_LIST_PLACEHOLDER: &str = "Imported list";

/// Result of merging an imported document
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// The merged document
    pub document: Document,

    /// Ids of the appended lists, in import order
    pub added_lists: Vec<ListId>,

    /// Number of appended tasks
    pub added_tasks: usize,

    /// Imported tasks dropped because their list was not imported
    pub dropped_tasks: usize,
}

/// Returns `base`, or `base(n)` for the smallest `n >= 1` not in `taken`,
/// and records the result in `taken`
pub fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    let base = match base.trim() {
        "" => IMPORTED_LIST_PLACEHOLDER,
        trimmed => trimmed,
    };

    if taken.insert(base.to_string()) {
        return base.to_string();
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}({})", base, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Merges `imported` into `current` using the wall clock for new ids
pub fn merge_imported_state(current: &Document, imported: &Document) -> MergeResult {
    merge_imported_state_at(current, imported, current_timestamp())
}

/// Merges `imported` into `current` with an explicit timestamp
///
/// `now` seeds the id prefixes and the `createdAt` of appended lists
/// (`now + i` for the i-th imported list).
pub fn merge_imported_state_at(current: &Document, imported: &Document, now: i64) -> MergeResult {
    let base = current.normalized();

    let mut names: HashSet<String> = base.lists.iter().map(|l| l.name.clone()).collect();
    let mut list_ids: HashSet<String> = base.lists.iter().map(|l| l.id.to_string()).collect();
    let mut task_ids: HashSet<String> = base.tasks.iter().map(|t| t.id.to_string()).collect();

    let list_prefix = format!("list-import-{}-", now);
    let task_prefix = format!("task-import-{}-", now);

    let mut mapping: HashMap<&ListId, ListId> = HashMap::new();
    let mut appended_lists = Vec::with_capacity(imported.lists.len());

    for (i, list) in imported.lists.iter().enumerate() {
        let id = ListId::from(unique_id(&list_prefix, i, &mut list_ids));
        let name = unique_name(&list.name, &mut names);

        mapping.insert(&list.id, id.clone());
        appended_lists.push(TaskList {
            id,
            name,
            description: list.description.clone(),
            created_at: now + i as i64,
        });
    }

    let mut appended_tasks = Vec::with_capacity(imported.tasks.len());
    let mut dropped_tasks = 0;

    for (j, task) in imported.tasks.iter().enumerate() {
        let Some(list_id) = mapping.get(&task.list_id) else {
            dropped_tasks += 1;
            continue;
        };

        appended_tasks.push(Task {
            id: TaskId::from(unique_id(&task_prefix, j, &mut task_ids)),
            list_id: list_id.clone(),
            ..task.clone()
        });
    }

    let current_list_id = mapping
        .get(&imported.current_list_id)
        .cloned()
        .or_else(|| appended_lists.first().map(|list| list.id.clone()))
        .unwrap_or_else(|| base.current_list_id.clone());

    let added_lists: Vec<ListId> = appended_lists.iter().map(|l| l.id.clone()).collect();
    let added_tasks = appended_tasks.len();

    let mut lists = base.lists;
    lists.extend(appended_lists);
    let mut tasks = base.tasks;
    tasks.extend(appended_tasks);

    MergeResult {
        document: Document::new(current_list_id, lists, tasks),
        added_lists,
        added_tasks,
        dropped_tasks,
    }
}
