//! Share payload builder
//!
//! Projects one list out of a document into the request body the sharing
//! service's create-list endpoint expects. No network access happens here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{current_timestamp, Document, ListId, Task, TaskList};

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("selected list was not found: {0}")]
    ListNotFound(ListId),

    #[error("Failed to serialize share payload")]
    Serialize(#[source] serde_json::Error),
}

/// What to publish and how to label it
#[derive(Debug, Clone)]
pub struct ShareOptions {
    pub list_id: ListId,
    pub title: String,
    pub game_key: String,
    pub character_key: String,
    pub version_text: Option<String>,
    pub description: Option<String>,
    /// Anti-abuse token, passed through untouched
    pub turnstile_token: String,
    /// Id of the shared list this one derives from
    pub parent_id: Option<String>,
}

/// Body of `POST /lists`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub title: String,
    pub game_key: String,
    pub character_key: String,
    pub payload_json: String,
    pub turnstile_token: String,
    pub version_text: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Builds a standalone single-list document for the given list
pub fn shared_document(doc: &Document, list_id: &ListId, title: &str, now: i64) -> Option<Document> {
    let list = doc.list(list_id)?;
    let export_id = ListId::from(format!("share-{}", now));

    let tasks = doc
        .tasks_by_list(list_id)
        .into_iter()
        .map(|task| Task {
            list_id: export_id.clone(),
            ..task.clone()
        })
        .collect();

    let exported = TaskList {
        id: export_id.clone(),
        name: title.to_string(),
        description: list.description.clone(),
        created_at: now,
    };

    Some(Document::new(export_id, vec![exported], tasks))
}

/// Builds the create-list request for the selected list
pub fn build_share_payload(doc: &Document, options: &ShareOptions) -> Result<ShareRequest, ShareError> {
    build_share_payload_at(doc, options, current_timestamp())
}

/// Builds the create-list request with an explicit timestamp
pub fn build_share_payload_at(
    doc: &Document,
    options: &ShareOptions,
    now: i64,
) -> Result<ShareRequest, ShareError> {
    let shared = shared_document(doc, &options.list_id, &options.title, now)
        .ok_or_else(|| ShareError::ListNotFound(options.list_id.clone()))?;
    let payload_json = serde_json::to_string(&shared).map_err(ShareError::Serialize)?;

    Ok(ShareRequest {
        title: options.title.clone(),
        game_key: options.game_key.clone(),
        character_key: options.character_key.clone(),
        payload_json,
        turnstile_token: options.turnstile_token.clone(),
        version_text: normalize_optional_text(options.version_text.as_deref()),
        description: normalize_optional_text(options.description.as_deref()),
        parent_id: options
            .parent_id
            .clone()
            .filter(|parent| !parent.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskId, TaskStatus};
    use crate::storage::import_state_data;

    fn base_doc() -> Document {
        let mut done = Task::new(TaskId::from("t2"), "B", ListId::from("l1"));
        done.status = TaskStatus::Done;
        done.count = 1;

        Document::new(
            ListId::from("l1"),
            vec![
                TaskList::new(ListId::from("l1"), "Ryu Plan", 10).with_description("Ryu list desc"),
                TaskList::new(ListId::from("l2"), "Ken Plan", 20).with_description("Ken list desc"),
            ],
            vec![
                Task::new(TaskId::from("t1"), "A", ListId::from("l1")),
                done,
                Task::new(TaskId::from("t3"), "C", ListId::from("l2")),
            ],
        )
    }

    fn options(list_id: &str) -> ShareOptions {
        ShareOptions {
            list_id: ListId::from(list_id),
            title: "Ryu Public".to_string(),
            game_key: "sf6".to_string(),
            character_key: "ryu".to_string(),
            version_text: Some("v1".to_string()),
            description: Some("for training".to_string()),
            turnstile_token: "bypass-local".to_string(),
            parent_id: None,
        }
    }

    #[test]
    fn exports_only_selected_list_tasks() {
        let request = build_share_payload_at(&base_doc(), &options("l1"), 99).unwrap();

        assert_eq!(request.title, "Ryu Public");
        assert_eq!(request.game_key, "sf6");
        assert_eq!(request.character_key, "ryu");
        assert_eq!(request.turnstile_token, "bypass-local");
        assert_eq!(request.version_text.as_deref(), Some("v1"));

        let parsed: serde_json::Value = serde_json::from_str(&request.payload_json).unwrap();
        assert_eq!(parsed["currentListId"], "share-99");
        assert_eq!(parsed["lists"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["lists"][0]["name"], "Ryu Public");
        assert_eq!(parsed["lists"][0]["description"], "Ryu list desc");

        let tasks = parsed["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|task| task["listId"] == parsed["currentListId"]));
    }

    #[test]
    fn payload_is_an_importable_backup() {
        let request = build_share_payload_at(&base_doc(), &options("l2"), 5).unwrap();
        let doc = import_state_data(&request.payload_json).unwrap();

        assert_eq!(doc.tasks.len(), 1);
        assert_eq!(doc.tasks[0].title, "C");
    }

    #[test]
    fn optional_text_is_trimmed_or_null() {
        let mut opts = options("l1");
        opts.version_text = Some("   ".to_string());
        opts.description = Some("  notes ".to_string());
        opts.parent_id = Some("  ".to_string());

        let request = build_share_payload_at(&base_doc(), &opts, 1).unwrap();
        assert_eq!(request.version_text, None);
        assert_eq!(request.description.as_deref(), Some("notes"));
        assert_eq!(request.parent_id, None);

        let json = serde_json::to_value(&request).unwrap();
        assert!(json["version_text"].is_null());
        assert!(json["parent_id"].is_null());
    }

    #[test]
    fn parent_id_is_kept_when_present() {
        let mut opts = options("l1");
        opts.parent_id = Some("abc-123".to_string());

        let request = build_share_payload_at(&base_doc(), &opts, 1).unwrap();
        assert_eq!(request.parent_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn unknown_list_is_an_error() {
        let err = build_share_payload_at(&base_doc(), &options("zz"), 1).unwrap_err();
        assert!(matches!(err, ShareError::ListNotFound(_)));
        assert!(err.to_string().starts_with("selected list was not found"));
    }
}
