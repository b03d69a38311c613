use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store error: {0}")]
    Backend(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Flat field map a record is persisted as. The record id is not part of the
/// map; it lives in the store key (`namespace:id`).
pub type FieldMap = HashMap<String, String>;

/// Flat-record encoding for everything kept in the store. Scalars render via
/// `Display`; enums and timestamps as their canonical string form.
pub trait Record: Sized + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn to_fields(&self) -> FieldMap;
    fn from_fields(id: &str, fields: &FieldMap) -> Result<Self, StoreError>;

    /// Stream entries carry the id inline since there is no key to hold it.
    fn to_stream_fields(&self) -> FieldMap {
        let mut fields = self.to_fields();
        fields.insert("id".to_string(), self.id().to_string());
        fields
    }
}

pub fn required<'a>(fields: &'a FieldMap, name: &str) -> Result<&'a str, StoreError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| StoreError::Corrupt(format!("missing field `{name}`")))
}

pub fn parsed<T>(fields: &FieldMap, name: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    required(fields, name)?
        .parse()
        .map_err(|e| StoreError::Corrupt(format!("field `{name}`: {e}")))
}

/// Client contract for the namespaced key-value store backing both services.
///
/// Keys are `namespace:id`. A `get` of a missing key is `Ok(None)`, never an
/// error. `save` writes the full field map at the record's id, so a first
/// save creates and a later save of the same record overwrites. `publish`
/// appends to a named append-only stream; no consumer is defined here.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
    async fn save<T: Record>(&self, record: &T, namespace: &str) -> Result<String, StoreError>;
    async fn get<T: Record>(&self, id: &str, namespace: &str) -> Result<Option<T>, StoreError>;
    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StoreError>;
    async fn delete(&self, id: &str, namespace: &str) -> Result<u64, StoreError>;
    async fn publish<T: Record>(&self, stream: &str, record: &T) -> Result<(), StoreError>;
}
