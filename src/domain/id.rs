//! Identifiers for tasks and lists
//!
//! ID Format:
//! - Generated IDs: `{prefix}-{millis}-{8-char-hash}` (e.g., `list-1718000000000-7f2b4c1a`)
//! - Unique-against-set IDs: `{prefix}{n}` where `n` is the first free probe
//!
//! Hash is derived from the nanosecond clock, the process id and a
//! process-wide counter, so two IDs minted in the same millisecond differ.
//! Identifiers read from documents are opaque: any non-empty string is valid.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID: expected a non-empty string, got '{0}'")]
    InvalidTaskId(String),

    #[error("Invalid list ID: expected a non-empty string, got '{0}'")]
    InvalidListId(String),
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates an 8-character hash that differs for every call in this process
fn generate_hash() -> String {
    let now = Utc::now();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}:{}:{}",
        now.timestamp_nanos_opt().unwrap_or(0),
        std::process::id(),
        sequence
    );
    let hash = blake3::hash(input.as_bytes());
    hash.to_hex()[..8].to_string()
}

/// Returns a fresh identifier: `{prefix}-{millis}-{hash}`, or `{millis}-{hash}`
/// when no prefix is given
pub fn new_id(prefix: Option<&str>) -> String {
    let millis = Utc::now().timestamp_millis();
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}-{}-{}", prefix, millis, generate_hash()),
        _ => format!("{}-{}", millis, generate_hash()),
    }
}

/// Returns `{prefix}{n}` for the smallest `n >= start` not in `taken`, and
/// records it in `taken`
pub fn unique_id(prefix: &str, start: usize, taken: &mut HashSet<String>) -> String {
    let mut n = start;
    loop {
        let candidate = format!("{}{}", prefix, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $error:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mints a new identifier
            pub fn generate() -> Self {
                Self(new_id(Some($prefix)))
            }

            /// Returns the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true for the empty identifier, which never matches a stored entity
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(IdError::$error(s.to_string()));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Task identifier, immutable once created
    TaskId,
    "task",
    InvalidTaskId
);

string_id!(
    /// List identifier, immutable once created
    ListId,
    "list",
    InvalidListId
);
