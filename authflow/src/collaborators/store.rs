//! Data store collaborator.

use crate::errors::ErrorRecord;
use crate::observability::Logger;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Opaque read/write access to persistent records.
///
/// Failures are `NotFound`, `Duplicate`, or `System` records.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Fetches the record stored under `key`.
    async fn fetch(&self, collection: &str, key: &str) -> Result<Value, ErrorRecord>;

    /// Inserts a new record. Fails with `Duplicate` if `key` is taken.
    async fn insert(
        &self,
        collection: &str,
        key: &str,
        record: Value,
    ) -> Result<Value, ErrorRecord>;

    /// Replaces an existing record. Fails with `NotFound` if `key` is absent.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        record: Value,
    ) -> Result<Value, ErrorRecord>;
}

/// A concurrent in-memory store keyed by `(collection, key)`.
pub struct InMemoryDataStore {
    records: DashMap<(String, String), Value>,
    logger: Arc<dyn Logger>,
}

impl std::fmt::Debug for InMemoryDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDataStore")
            .field("records", &self.records.len())
            .finish()
    }
}

impl InMemoryDataStore {
    /// Creates an empty store that reports operations to `logger`.
    #[must_use]
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            records: DashMap::new(),
            logger,
        }
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DataStore for InMemoryDataStore {
    async fn fetch(&self, collection: &str, key: &str) -> Result<Value, ErrorRecord> {
        self.logger
            .query(&format!("SELECT record FROM {collection} WHERE key = ?"), &[Value::from(key)]);

        self.records
            .get(&(collection.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ErrorRecord::not_found(format!("No record in {collection}"), key))
    }

    async fn insert(
        &self,
        collection: &str,
        key: &str,
        record: Value,
    ) -> Result<Value, ErrorRecord> {
        self.logger.query(
            &format!("INSERT INTO {collection} (key, record) VALUES (?, ?)"),
            &[Value::from(key), record.clone()],
        );

        match self.records.entry((collection.to_string(), key.to_string())) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(ErrorRecord::duplicate(
                format!("Record already exists in {collection}"),
                key,
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        record: Value,
    ) -> Result<Value, ErrorRecord> {
        self.logger.query(
            &format!("UPDATE {collection} SET record = ? WHERE key = ?"),
            &[record.clone(), Value::from(key)],
        );

        match self.records.get_mut(&(collection.to_string(), key.to_string())) {
            Some(mut entry) => {
                *entry.value_mut() = record.clone();
                Ok(record)
            }
            None => Err(ErrorRecord::not_found(format!("No record in {collection}"), key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::observability::NoOpLogger;
    use serde_json::json;

    fn store() -> InMemoryDataStore {
        InMemoryDataStore::new(Arc::new(NoOpLogger))
    }

    #[tokio::test]
    async fn test_insert_then_fetch() {
        let store = store();
        store.insert("users", "alice", json!({"account_id": 1})).await.unwrap();

        let record = store.fetch("users", "alice").await.unwrap();
        assert_eq!(record["account_id"], 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate() {
        let store = store();
        store.insert("users", "alice", json!({})).await.unwrap();

        let err = store.insert("users", "alice", json!({})).await.unwrap_err();
        assert!(err.is(ErrorKind::Duplicate));
        assert_eq!(err.id.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let err = store().fetch("users", "nobody").await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_update() {
        let store = store();
        assert!(store.update("users", "bob", json!({})).await.unwrap_err().is(ErrorKind::NotFound));

        store.insert("users", "bob", json!({"password": "old"})).await.unwrap();
        store.update("users", "bob", json!({"password": "new"})).await.unwrap();
        assert_eq!(store.fetch("users", "bob").await.unwrap()["password"], "new");
    }
}
