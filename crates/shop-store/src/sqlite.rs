use async_trait::async_trait;
use shop_types::ports::store::{FieldMap, KeyValueStore, Record, StoreError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;

/// SQLite-backed store adapter. The flat field map of a record is kept as a
/// JSON object in a single column; streams are an append-only table ordered
/// by an autoincrement sequence.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Run migrations from migration files, one statement each.
        for ddl in [
            include_str!("../migrations/0001_create_records.sql"),
            include_str!("../migrations/0002_create_stream_entries.sql"),
        ] {
            sqlx::query(ddl).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn encode_fields(fields: &FieldMap) -> Result<String, StoreError> {
    serde_json::to_string(fields).map_err(|e| StoreError::Backend(e.to_string()))
}

fn decode_fields(raw: &str) -> Result<FieldMap, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn save<T: Record>(&self, record: &T, namespace: &str) -> Result<String, StoreError> {
        let fields = encode_fields(&record.to_fields())?;
        sqlx::query(
            "INSERT INTO records (namespace, id, fields) VALUES (?, ?, ?)
             ON CONFLICT(namespace, id) DO UPDATE SET fields = excluded.fields",
        )
        .bind(namespace)
        .bind(record.id())
        .bind(fields)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(record.id().to_string())
    }

    async fn get<T: Record>(&self, id: &str, namespace: &str) -> Result<Option<T>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT fields FROM records WHERE namespace = ? AND id = ?")
                .bind(namespace)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        match row {
            Some((raw,)) => {
                let fields = decode_fields(&raw)?;
                T::from_fields(id, &fields).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM records WHERE namespace = ?")
            .bind(namespace)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn delete(&self, id: &str, namespace: &str) -> Result<u64, StoreError> {
        let res = sqlx::query("DELETE FROM records WHERE namespace = ? AND id = ?")
            .bind(namespace)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(res.rows_affected())
    }

    async fn publish<T: Record>(&self, stream: &str, record: &T) -> Result<(), StoreError> {
        let fields = encode_fields(&record.to_stream_fields())?;
        sqlx::query("INSERT INTO stream_entries (stream, fields) VALUES (?, ?)")
            .bind(stream)
            .bind(fields)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}
