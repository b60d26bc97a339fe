//! Typed collection adapter over a key-value store.

use super::{KeyValueStore, StoreError, StoreResult};
use crate::model::lead::Lead;
use crate::model::opportunity::Opportunity;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const LEADS_KEY: &str = "leads";
pub const OPPORTUNITIES_KEY: &str = "opportunities";

/// Reads and writes the two console collections as JSON snapshots.
pub struct PersistentStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> PersistentStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Underlying key-value backend.
    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn load_leads(&self) -> StoreResult<Vec<Lead>> {
        self.load(LEADS_KEY)
    }

    pub fn load_opportunities(&self) -> StoreResult<Vec<Opportunity>> {
        self.load(OPPORTUNITIES_KEY)
    }

    pub fn save_leads(&self, leads: &[Lead]) -> StoreResult<()> {
        let payload = encode(LEADS_KEY, leads)?;
        self.kv.set(LEADS_KEY, &payload)
    }

    /// Writes both collections in one backend call.
    pub fn save_all(&self, leads: &[Lead], opportunities: &[Opportunity]) -> StoreResult<()> {
        let leads_payload = encode(LEADS_KEY, leads)?;
        let opportunities_payload = encode(OPPORTUNITIES_KEY, opportunities)?;
        self.kv.set_many(&[
            (LEADS_KEY, leads_payload.as_str()),
            (OPPORTUNITIES_KEY, opportunities_payload.as_str()),
        ])
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.kv.get(key)? {
            Some(payload) => {
                serde_json::from_str(&payload).map_err(|source| StoreError::Serialization {
                    key: key.to_string(),
                    source,
                })
            }
            None => Ok(Vec::new()),
        }
    }
}

fn encode<T: Serialize>(key: &str, items: &[T]) -> StoreResult<String> {
    serde_json::to_string(items).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}
