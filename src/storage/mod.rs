//! # Storage Layer
//!
//! Persistence for Tally: the versioned document schema, the key-value
//! storage collaborator, configuration and the application session.
//!
//! ## Storage Format
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Document | JSON, schema version 2 | `{data_dir}/{storage_key}.json` |
//! | Backup | Same JSON as the document | user-chosen file |
//! | Config | TOML | `~/.config/tally/config.toml` |
//!
//! ## Load Policies
//!
//! - [`load_state`] is lenient: corrupt or invalid data is logged and
//!   replaced by the onboarding document
//! - [`import_state_data`] is strict: invalid backups are errors
//!
//! ## Key Types
//!
//! - [`Session`] - Owns the authoritative document and persists commits
//! - [`KeyValueStorage`] - Storage collaborator ([`FileStorage`], [`MemoryStorage`])
//! - [`VersionedDocument`] - Schema version 1 or 2, with migration
//! - [`Config`] - User configuration

mod kv;
mod schema;
mod store;
mod config;
mod session;

pub use kv::{FileStorage, KeyValueStorage, MemoryStorage};
pub use schema::{migrate, validate, SchemaError, V1Document, V1Task, VersionedDocument};
pub use store::{
    export_state_data, import_state_data, load_state, parse_state_payload, save_state,
    LogLogger, Logger, StoreError, Strictness, STORAGE_KEY,
};
pub use config::{
    resolve_base_url, Config, ConfigError, ShareConfig, DEFAULT_SHARE_BASE_URL, SHARE_API_ENV,
    SHARE_APP_ENV,
};
pub use session::Session;
