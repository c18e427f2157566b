//! Loading, saving, exporting and importing documents
//!
//! Two parse policies share one routine:
//! - [`Strictness::Lenient`] (used by [`load_state`]) logs a warning and
//!   falls back to the onboarding document
//! - [`Strictness::Strict`] (used by [`import_state_data`]) returns an error
//!   so the caller can tell a bad file from a substituted empty state

use serde_json::Value;
use thiserror::Error;

use super::kv::KeyValueStorage;
use super::schema::{SchemaError, VersionedDocument};
use crate::domain::Document;

/// Default storage key
pub const STORAGE_KEY: &str = "fg_task_manager_v1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid backup schema")]
    InvalidSchema(#[source] SchemaError),

    #[error("Invalid backup data")]
    InvalidData(#[source] serde_json::Error),

    #[error("Failed to serialize document")]
    Serialize(#[source] serde_json::Error),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),
}

/// Receives warnings from the persistence layer
pub trait Logger {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// How invalid payloads are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Invalid payloads are errors
    Strict,
    /// Invalid payloads are logged and replaced by the onboarding document
    Lenient,
}

/// Validates, migrates and normalizes a parsed payload
pub fn parse_state_payload(
    payload: &Value,
    strictness: Strictness,
    logger: &dyn Logger,
) -> Result<Document, StoreError> {
    match VersionedDocument::detect(payload) {
        Ok(doc) => Ok(doc.into_current()),
        Err(err) => match strictness {
            Strictness::Strict => Err(StoreError::InvalidSchema(err)),
            Strictness::Lenient => {
                logger.warn(&format!(
                    "[store] Invalid schema ({}). Fallback to initial state.",
                    err
                ));
                Ok(Document::initial())
            }
        },
    }
}

/// Reads the document stored under `key`, never failing
///
/// Missing or empty data yields the onboarding document. Unreadable,
/// unparseable or invalid data is logged once and also yields it.
pub fn load_state(storage: &dyn KeyValueStorage, key: &str, logger: &dyn Logger) -> Document {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => return Document::initial(),
        Err(e) => {
            logger.warn(&format!(
                "[store] Failed to read stored data ({:#}). Fallback to initial state.",
                e
            ));
            return Document::initial();
        }
    };

    let payload: Value = match serde_json::from_str(&raw) {
        Ok(payload) => payload,
        Err(e) => {
            logger.warn(&format!(
                "[store] Failed to parse stored data ({}). Fallback to initial state.",
                e
            ));
            return Document::initial();
        }
    };

    parse_state_payload(&payload, Strictness::Lenient, logger)
        .unwrap_or_else(|_| Document::initial())
}

/// Normalizes and serializes a document in the current schema
pub fn export_state_data(doc: &Document) -> Result<String, StoreError> {
    serde_json::to_string(&doc.normalized()).map_err(StoreError::Serialize)
}

/// Persists the document under `key`
pub fn save_state(
    doc: &Document,
    storage: &mut dyn KeyValueStorage,
    key: &str,
) -> Result<(), StoreError> {
    let raw = export_state_data(doc)?;
    storage.set_item(key, &raw).map_err(StoreError::Storage)
}

/// Parses backup text strictly
pub fn import_state_data(raw: &str) -> Result<Document, StoreError> {
    let payload: Value = serde_json::from_str(raw).map_err(StoreError::InvalidData)?;
    parse_state_payload(&payload, Strictness::Strict, &LogLogger)
}
