//! List engine
//!
//! Pure operations over the lists of a [`Document`]. Duplicate or blank
//! names are rejected silently: the outcome is unchanged and the caller
//! decides how to surface it.

use super::document::{current_timestamp, Document, Outcome};
use super::id::ListId;
use super::list::TaskList;

impl Document {
    /// Returns true if a list other than `except` already uses `name`
    pub fn name_taken(&self, name: &str, except: Option<&ListId>) -> bool {
        self.lists
            .iter()
            .any(|list| Some(&list.id) != except && list.name == name)
    }

    /// Appends a new empty list and makes it current
    pub fn create_list(&self, name: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() || self.name_taken(name, None) {
            return Outcome::unchanged(self);
        }

        let list = TaskList::new(ListId::generate(), name, current_timestamp());
        let mut next = self.clone();
        next.current_list_id = list.id.clone();
        next.lists.push(list);
        Outcome::changed(next)
    }

    /// Switches the current list
    pub fn select_list(&self, list_id: &ListId) -> Outcome {
        if !self.has_list(list_id) {
            return Outcome::unchanged(self);
        }

        Outcome::compare(
            self,
            Document {
                current_list_id: list_id.clone(),
                ..self.clone()
            },
        )
    }

    /// Renames a list to the trimmed candidate
    ///
    /// No-op when the candidate is blank or another list already has that
    /// exact name.
    pub fn rename_list(&self, list_id: &ListId, candidate: &str) -> Outcome {
        let name = candidate.trim();
        if name.is_empty() || self.name_taken(name, Some(list_id)) {
            return Outcome::unchanged(self);
        }

        let mut next = self.clone();
        if let Some(list) = next.lists.iter_mut().find(|list| &list.id == list_id) {
            list.name = name.to_string();
        }
        Outcome::compare(self, next)
    }

    /// Replaces a list's description with the trimmed text
    pub fn describe_list(&self, list_id: &ListId, description: &str) -> Outcome {
        let mut next = self.clone();
        if let Some(list) = next.lists.iter_mut().find(|list| &list.id == list_id) {
            list.description = description.trim().to_string();
        }
        Outcome::compare(self, next)
    }

    /// Deletes a list together with its tasks
    ///
    /// The last remaining list cannot be deleted. When the current list is
    /// deleted, the first remaining list becomes current.
    pub fn delete_list(&self, list_id: &ListId) -> Outcome {
        if self.lists.len() <= 1 || !self.has_list(list_id) {
            return Outcome::unchanged(self);
        }

        let lists: Vec<TaskList> = self
            .lists
            .iter()
            .filter(|list| &list.id != list_id)
            .cloned()
            .collect();
        let tasks = self
            .tasks
            .iter()
            .filter(|task| !task.belongs_to(list_id))
            .cloned()
            .collect();
        let current_list_id = if &self.current_list_id == list_id {
            lists[0].id.clone()
        } else {
            self.current_list_id.clone()
        };

        Outcome::changed(Document {
            schema_version: self.schema_version,
            current_list_id,
            lists,
            tasks,
        })
    }
}
