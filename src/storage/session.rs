//! Application session
//!
//! A [`Session`] owns the single authoritative document together with the
//! storage it was loaded from. Engine operations produce an [`Outcome`];
//! [`Session::commit`] persists it.

use anyhow::Result;

use super::config::Config;
use super::kv::{FileStorage, KeyValueStorage};
use super::store::{load_state, save_state, LogLogger, Logger, StoreError};
use crate::domain::{Document, Outcome};

pub struct Session<S: KeyValueStorage> {
    storage: S,
    key: String,
    document: Document,
}

impl<S: KeyValueStorage> Session<S> {
    /// Loads the document stored under `key`, warning through the `log` facade
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        Self::open_with_logger(storage, key, &LogLogger)
    }

    /// Loads the document stored under `key`
    pub fn open_with_logger(storage: S, key: impl Into<String>, logger: &dyn Logger) -> Self {
        let key = key.into();
        let document = load_state(&storage, &key, logger);
        Self {
            storage,
            key,
            document,
        }
    }

    /// The current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The storage backing this session
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adopts the outcome's document and persists it if it changed
    ///
    /// Returns whether anything was written.
    pub fn commit(&mut self, outcome: Outcome) -> Result<bool, StoreError> {
        if !outcome.changed {
            return Ok(false);
        }
        self.replace(outcome.document)?;
        Ok(true)
    }

    /// Adopts and persists a document unconditionally
    pub fn replace(&mut self, document: Document) -> Result<(), StoreError> {
        save_state(&document, &mut self.storage, &self.key)?;
        self.document = document;
        Ok(())
    }
}

impl Session<FileStorage> {
    /// Opens the file-backed session described by the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let dir = config.data_dir()?;
        log::debug!(
            "Opening store '{}' in {}",
            config.storage_key,
            dir.display()
        );
        Ok(Self::open(FileStorage::new(dir), config.storage_key.clone()))
    }
}
