use async_trait::async_trait;
use dashmap::DashMap;
use shop_types::ports::store::{FieldMap, KeyValueStore, Record, StoreError};
use std::sync::Arc;

/// In-memory store adapter. Records live in a concurrent map keyed
/// `namespace:id`; streams are plain append-only vectors.
#[derive(Clone)]
pub struct InMemoryStore {
    records: Arc<DashMap<String, FieldMap>>,
    streams: Arc<DashMap<String, Vec<FieldMap>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            streams: Arc::new(DashMap::new()),
        }
    }

    /// Entries published to a stream so far, in publish order.
    pub fn stream_entries(&self, stream: &str) -> Vec<FieldMap> {
        self.streams
            .get(stream)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(namespace: &str, id: &str) -> String {
    format!("{namespace}:{id}")
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn save<T: Record>(&self, record: &T, namespace: &str) -> Result<String, StoreError> {
        self.records
            .insert(key(namespace, record.id()), record.to_fields());
        Ok(record.id().to_string())
    }

    async fn get<T: Record>(&self, id: &str, namespace: &str) -> Result<Option<T>, StoreError> {
        match self.records.get(&key(namespace, id)) {
            Some(fields) => T::from_fields(id, &fields).map(Some),
            None => Ok(None),
        }
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        let prefix = format!("{namespace}:");
        Ok(self
            .records
            .iter()
            .filter_map(|kv| kv.key().strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    async fn delete(&self, id: &str, namespace: &str) -> Result<u64, StoreError> {
        Ok(self.records.remove(&key(namespace, id)).map_or(0, |_| 1))
    }

    async fn publish<T: Record>(&self, stream: &str, record: &T) -> Result<(), StoreError> {
        self.streams
            .entry(stream.to_string())
            .or_default()
            .push(record.to_stream_fields());
        Ok(())
    }
}
