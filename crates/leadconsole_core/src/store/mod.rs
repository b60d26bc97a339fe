//! Durable key-value storage for the lead console collections.
//!
//! # Responsibility
//! - Define the key-value contract the repository persists through.
//! - Provide SQLite-backed and in-memory implementations.
//! - Serialize whole-collection snapshots under stable keys.
//!
//! # Invariants
//! - Each key holds a complete JSON array snapshot; no deltas.
//! - An absent key reads as an empty collection.
//! - Undecodable payloads are reported, never silently dropped.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod persistent;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use persistent::{PersistentStore, LEADS_KEY, OPPORTUNITIES_KEY};
pub use sqlite::SqliteKeyValueStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error for key-value access and payload decoding.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// Database was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Collection could not be encoded or decoded as JSON.
    Serialization {
        key: String,
        source: serde_json::Error,
    },
    /// Backend refused the operation.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "database schema version {found} is newer than supported {supported}"
            ),
            Self::Serialization { key, source } => {
                write!(f, "invalid payload for key `{key}`: {source}")
            }
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialization { source, .. } => Some(source),
            Self::SchemaTooNew { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Minimal string key-value contract.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes several entries. Implementations that can should make this
    /// all-or-nothing.
    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        (**self).set_many(entries)
    }
}
