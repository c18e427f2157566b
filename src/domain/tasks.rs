//! Task engine
//!
//! Pure operations over the tasks of a [`Document`]. Rejected input (blank
//! title, unknown list, unknown task) yields an unchanged [`Outcome`].

use std::collections::HashSet;

use super::document::{Document, Outcome};
use super::id::{ListId, TaskId};
use super::task::{Task, TaskStatus};

impl Document {
    /// Applies `update` to the task with the given id
    fn update_task(&self, task_id: &TaskId, update: impl Fn(&mut Task)) -> Outcome {
        let mut next = self.clone();
        if let Some(task) = next.tasks.iter_mut().find(|task| &task.id == task_id) {
            update(task);
        }
        Outcome::compare(self, next)
    }

    /// Appends a new active task to the given list
    ///
    /// No-op when the trimmed title is empty or the list id is empty or unknown.
    pub fn add_task(&self, title: &str, list_id: &ListId) -> Outcome {
        let title = title.trim();
        if title.is_empty() || list_id.is_empty() || !self.has_list(list_id) {
            return Outcome::unchanged(self);
        }

        let mut next = self.clone();
        next.tasks
            .push(Task::new(TaskId::generate(), title, list_id.clone()));
        Outcome::changed(next)
    }

    /// Increments the success counter
    pub fn inc_count(&self, task_id: &TaskId) -> Outcome {
        self.update_task(task_id, |task| task.count = task.count.saturating_add(1))
    }

    /// Resets the success counter to zero
    pub fn reset_count(&self, task_id: &TaskId) -> Outcome {
        self.update_task(task_id, |task| task.count = 0)
    }

    /// Marks a task done; the counter is kept
    pub fn complete_task(&self, task_id: &TaskId) -> Outcome {
        self.update_task(task_id, |task| task.status = TaskStatus::Done)
    }

    /// Marks a task active again; the counter is kept
    pub fn restore_task(&self, task_id: &TaskId) -> Outcome {
        self.update_task(task_id, |task| task.status = TaskStatus::Active)
    }

    /// Removes a task permanently
    pub fn delete_task(&self, task_id: &TaskId) -> Outcome {
        let mut next = self.clone();
        next.tasks.retain(|task| &task.id != task_id);
        Outcome::compare(self, next)
    }

    /// Tasks of one list, in document order
    pub fn tasks_by_list(&self, list_id: &ListId) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.belongs_to(list_id))
            .collect()
    }

    /// Moves an active task to a new position among the active tasks of its list
    ///
    /// `to_index` is clamped to the last active position; being unsigned, it
    /// can't fall below the first. Done tasks and tasks of other lists keep
    /// their positions in the collection.
    pub fn reorder_active_task(&self, list_id: &ListId, task_id: &TaskId, to_index: usize) -> Outcome {
        let participates = |task: &Task| task.belongs_to(list_id) && task.is_active();

        let mut order: Vec<&Task> = self.tasks.iter().filter(|task| participates(task)).collect();

        let Some(from) = order.iter().position(|task| &task.id == task_id) else {
            return Outcome::unchanged(self);
        };

        let to = to_index.min(order.len() - 1);
        if to == from {
            return Outcome::unchanged(self);
        }

        let moved = order.remove(from);
        order.insert(to, moved);

        // Slots are refilled with the tasks themselves, so duplicate ids survive
        let mut replacements = order.into_iter();
        let tasks = self
            .tasks
            .iter()
            .map(|task| {
                if participates(task) {
                    replacements.next().unwrap_or(task).clone()
                } else {
                    task.clone()
                }
            })
            .collect();

        Outcome::changed(Document {
            tasks,
            ..self.clone()
        })
    }

    /// Clones the matching tasks into the destination list under fresh ids
    ///
    /// Originals are untouched. No-op when the destination is empty or
    /// unknown, `task_ids` is empty, or nothing matches.
    pub fn copy_tasks_to_list(&self, task_ids: &[TaskId], destination: &ListId) -> Outcome {
        let Some(requested) = self.transfer_request(task_ids, destination) else {
            return Outcome::unchanged(self);
        };

        let copies: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| requested.contains(&task.id))
            .map(|task| Task {
                id: TaskId::generate(),
                list_id: destination.clone(),
                ..task.clone()
            })
            .collect();

        if copies.is_empty() {
            return Outcome::unchanged(self);
        }

        let mut next = self.clone();
        next.tasks.extend(copies);
        Outcome::changed(next)
    }

    /// Re-homes the matching tasks to the destination list, keeping their ids
    /// and positions
    pub fn move_tasks_to_list(&self, task_ids: &[TaskId], destination: &ListId) -> Outcome {
        let Some(requested) = self.transfer_request(task_ids, destination) else {
            return Outcome::unchanged(self);
        };

        let mut next = self.clone();
        for task in next.tasks.iter_mut().filter(|task| requested.contains(&task.id)) {
            task.list_id = destination.clone();
        }
        Outcome::compare(self, next)
    }

    /// Deduplicated id set for copy/move, or `None` when the request is a no-op
    fn transfer_request<'a>(
        &self,
        task_ids: &'a [TaskId],
        destination: &ListId,
    ) -> Option<HashSet<&'a TaskId>> {
        if destination.is_empty() || task_ids.is_empty() || !self.has_list(destination) {
            return None;
        }
        Some(task_ids.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskList;

    fn base_doc() -> Document {
        Document::new(
            ListId::from("l1"),
            vec![
                TaskList::new(ListId::from("l1"), "L1", 1),
                TaskList::new(ListId::from("l2"), "L2", 2),
            ],
            vec![],
        )
    }

    fn task(id: &str, list: &str, status: TaskStatus, count: u32) -> Task {
        Task {
            id: TaskId::from(id),
            title: id.to_uppercase(),
            status,
            count,
            list_id: ListId::from(list),
        }
    }

    fn seeded(tasks: Vec<Task>) -> Document {
        Document {
            tasks,
            ..base_doc()
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn add_task_trims_and_starts_active() {
        let out = base_doc().add_task("  Anti-air practice ", &ListId::from("l1"));

        assert!(out.changed);
        let task = &out.document.tasks[0];
        assert_eq!(task.title, "Anti-air practice");
        assert_eq!(task.status, TaskStatus::Active);
        assert_eq!(task.count, 0);
        assert_eq!(task.list_id.as_str(), "l1");
    }

    #[test]
    fn add_task_ignores_blank_title() {
        let out = base_doc().add_task("   ", &ListId::from("l1"));

        assert!(!out.changed);
        assert!(out.document.tasks.is_empty());
    }

    #[test]
    fn add_task_ignores_missing_list() {
        assert!(!base_doc().add_task("A", &ListId::from("")).changed);
        assert!(!base_doc().add_task("A", &ListId::from("nope")).changed);
    }

    #[test]
    fn add_then_delete_restores_length() {
        let doc = base_doc();
        let added = doc.add_task("A", &ListId::from("l1")).document;
        let id = added.tasks[0].id.clone();

        let removed = added.delete_task(&id);
        assert!(removed.changed);
        assert_eq!(removed.document.tasks.len(), doc.tasks.len());
    }

    #[test]
    fn inc_count_increments_only_target() {
        let doc = seeded(vec![
            task("1", "l1", TaskStatus::Active, 0),
            task("2", "l1", TaskStatus::Active, 4),
        ]);
        let out = doc.inc_count(&TaskId::from("1"));

        assert!(out.changed);
        assert_eq!(out.document.tasks[0].count, 1);
        assert_eq!(out.document.tasks[1].count, 4);
    }

    #[test]
    fn reset_count_resets_only_target() {
        let doc = seeded(vec![
            task("1", "l1", TaskStatus::Active, 4),
            task("2", "l1", TaskStatus::Active, 2),
        ]);
        let out = doc.reset_count(&TaskId::from("1"));

        assert_eq!(out.document.tasks[0].count, 0);
        assert_eq!(out.document.tasks[1].count, 2);
    }

    #[test]
    fn unknown_task_is_noop() {
        let doc = seeded(vec![task("1", "l1", TaskStatus::Active, 0)]);

        assert!(!doc.inc_count(&TaskId::from("x")).changed);
        assert!(!doc.complete_task(&TaskId::from("x")).changed);
        assert!(!doc.delete_task(&TaskId::from("x")).changed);
    }

    #[test]
    fn complete_then_restore_keeps_count() {
        let doc = seeded(vec![task("1", "l1", TaskStatus::Active, 5)]);
        let done = doc.complete_task(&TaskId::from("1")).document;
        assert_eq!(done.tasks[0].status, TaskStatus::Done);
        assert_eq!(done.tasks[0].count, 5);

        let restored = done.restore_task(&TaskId::from("1")).document;
        assert_eq!(restored.tasks[0].status, TaskStatus::Active);
        assert_eq!(restored.tasks[0].count, 5);
    }

    #[test]
    fn completing_a_done_task_reports_no_change() {
        let doc = seeded(vec![task("1", "l1", TaskStatus::Done, 0)]);
        assert!(!doc.complete_task(&TaskId::from("1")).changed);
    }

    #[test]
    fn delete_task_removes_only_target() {
        let doc = seeded(vec![
            task("1", "l1", TaskStatus::Done, 3),
            task("2", "l1", TaskStatus::Done, 5),
        ]);
        let out = doc.delete_task(&TaskId::from("1"));

        assert_eq!(ids(&out.document.tasks), vec!["2"]);
    }

    #[test]
    fn tasks_by_list_preserves_order() {
        let doc = seeded(vec![
            task("1", "l1", TaskStatus::Active, 1),
            task("2", "l1", TaskStatus::Done, 2),
            task("3", "l2", TaskStatus::Active, 3),
        ]);
        let listed: Vec<&str> = doc
            .tasks_by_list(&ListId::from("l1"))
            .iter()
            .map(|t| t.id.as_str())
            .collect();

        assert_eq!(listed, vec!["1", "2"]);
    }

    #[test]
    fn reorder_moves_first_to_last() {
        let doc = seeded(vec![
            task("a", "l1", TaskStatus::Active, 0),
            task("d", "l1", TaskStatus::Done, 0),
            task("b", "l1", TaskStatus::Active, 0),
            task("x", "l2", TaskStatus::Active, 0),
            task("c", "l1", TaskStatus::Active, 0),
        ]);
        let out = doc.reorder_active_task(&ListId::from("l1"), &TaskId::from("a"), 2);

        assert!(out.changed);
        assert_eq!(ids(&out.document.tasks), vec!["b", "d", "c", "x", "a"]);
    }

    #[test]
    fn reorder_clamps_out_of_range_index() {
        let doc = seeded(vec![
            task("a", "l1", TaskStatus::Active, 0),
            task("b", "l1", TaskStatus::Active, 0),
            task("c", "l1", TaskStatus::Active, 0),
        ]);
        let out = doc.reorder_active_task(&ListId::from("l1"), &TaskId::from("a"), 99);

        assert_eq!(ids(&out.document.tasks), vec!["b", "c", "a"]);
    }

    #[test]
    fn reorder_to_same_index_is_noop() {
        let doc = seeded(vec![
            task("a", "l1", TaskStatus::Active, 0),
            task("b", "l1", TaskStatus::Active, 0),
        ]);
        assert!(!doc.reorder_active_task(&ListId::from("l1"), &TaskId::from("b"), 5).changed);
    }

    #[test]
    fn reorder_ignores_done_and_foreign_tasks() {
        let doc = seeded(vec![
            task("a", "l1", TaskStatus::Done, 0),
            task("b", "l2", TaskStatus::Active, 0),
        ]);

        assert!(!doc.reorder_active_task(&ListId::from("l1"), &TaskId::from("a"), 0).changed);
        assert!(!doc.reorder_active_task(&ListId::from("l1"), &TaskId::from("b"), 0).changed);
    }

    #[test]
    fn reorder_keeps_tasks_sharing_an_id() {
        let mut first = task("dup", "l1", TaskStatus::Active, 0);
        first.title = "first".to_string();
        let mut second = task("dup", "l1", TaskStatus::Active, 0);
        second.title = "second".to_string();
        let mut third = task("c", "l1", TaskStatus::Active, 0);
        third.title = "third".to_string();

        let doc = seeded(vec![first, second, third]);
        let out = doc.reorder_active_task(&ListId::from("l1"), &TaskId::from("c"), 0);

        let titles: Vec<&str> = out.document.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn copy_creates_fresh_tasks_in_destination() {
        let doc = seeded(vec![
            task("1", "l1", TaskStatus::Active, 2),
            task("2", "l1", TaskStatus::Done, 1),
        ]);
        let out = doc.copy_tasks_to_list(
            &[TaskId::from("1"), TaskId::from("1"), TaskId::from("2")],
            &ListId::from("l2"),
        );

        assert!(out.changed);
        let tasks = &out.document.tasks;
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0], doc.tasks[0]);
        assert_eq!(tasks[1], doc.tasks[1]);
        assert_eq!(tasks[2].title, "1");
        assert_eq!(tasks[2].count, 2);
        assert_eq!(tasks[2].list_id.as_str(), "l2");
        assert_eq!(tasks[3].status, TaskStatus::Done);
        assert_ne!(tasks[2].id, tasks[0].id);
        assert_ne!(tasks[2].id, tasks[3].id);
    }

    #[test]
    fn copy_noops() {
        let doc = seeded(vec![task("1", "l1", TaskStatus::Active, 0)]);

        assert!(!doc.copy_tasks_to_list(&[TaskId::from("1")], &ListId::from("")).changed);
        assert!(!doc.copy_tasks_to_list(&[], &ListId::from("l2")).changed);
        assert!(!doc.copy_tasks_to_list(&[TaskId::from("zz")], &ListId::from("l2")).changed);
    }

    #[test]
    fn move_rehomes_in_place() {
        let doc = seeded(vec![
            task("1", "l1", TaskStatus::Active, 0),
            task("2", "l1", TaskStatus::Active, 0),
        ]);
        let out = doc.move_tasks_to_list(&[TaskId::from("2")], &ListId::from("l2"));

        assert!(out.changed);
        assert_eq!(ids(&out.document.tasks), vec!["1", "2"]);
        assert_eq!(out.document.tasks[1].list_id.as_str(), "l2");
        assert_eq!(out.document.tasks[0].list_id.as_str(), "l1");
    }

    #[test]
    fn move_noops() {
        let doc = seeded(vec![task("1", "l1", TaskStatus::Active, 0)]);

        assert!(!doc.move_tasks_to_list(&[TaskId::from("1")], &ListId::from("nope")).changed);
        assert!(!doc.move_tasks_to_list(&[TaskId::from("1")], &ListId::from("l1")).changed);
    }
}
