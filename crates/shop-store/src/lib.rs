#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a store feature: `memory` or `sqlite`.");

use shop_types::ports::store::{KeyValueStore, Record, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Store handle built once at process start and passed down to the services.
pub struct Store {
    #[cfg(feature = "memory")]
    memory: memory::InMemoryStore,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteStore,
}

pub async fn build_store(url: Option<&str>) -> anyhow::Result<Store> {
    Store::build(url).await
}

impl Store {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::InMemoryStore::new(),
        })
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://shop.db");
        let sqlite = sqlite::SqliteStore::new(url).await?;
        Ok(Self { sqlite })
    }

    // If both features are enabled, the durable backend wins.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build(database_url: Option<&str>) -> anyhow::Result<Self> {
        let memory = memory::InMemoryStore::new();
        let url = database_url.unwrap_or("sqlite://shop.db");
        let sqlite = sqlite::SqliteStore::new(url).await?;
        Ok(Self { memory, sqlite })
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl KeyValueStore for Store {
    async fn ping(&self) -> Result<(), StoreError> {
        self.memory.ping().await
    }

    async fn save<T: Record>(&self, record: &T, namespace: &str) -> Result<String, StoreError> {
        self.memory.save(record, namespace).await
    }

    async fn get<T: Record>(&self, id: &str, namespace: &str) -> Result<Option<T>, StoreError> {
        self.memory.get(id, namespace).await
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        self.memory.list_ids(namespace).await
    }

    async fn delete(&self, id: &str, namespace: &str) -> Result<u64, StoreError> {
        self.memory.delete(id, namespace).await
    }

    async fn publish<T: Record>(&self, stream: &str, record: &T) -> Result<(), StoreError> {
        self.memory.publish(stream, record).await
    }
}

#[cfg(all(feature = "sqlite", not(feature = "memory")))]
#[async_trait::async_trait]
impl KeyValueStore for Store {
    async fn ping(&self) -> Result<(), StoreError> {
        self.sqlite.ping().await
    }

    async fn save<T: Record>(&self, record: &T, namespace: &str) -> Result<String, StoreError> {
        self.sqlite.save(record, namespace).await
    }

    async fn get<T: Record>(&self, id: &str, namespace: &str) -> Result<Option<T>, StoreError> {
        self.sqlite.get(id, namespace).await
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        self.sqlite.list_ids(namespace).await
    }

    async fn delete(&self, id: &str, namespace: &str) -> Result<u64, StoreError> {
        self.sqlite.delete(id, namespace).await
    }

    async fn publish<T: Record>(&self, stream: &str, record: &T) -> Result<(), StoreError> {
        self.sqlite.publish(stream, record).await
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
#[async_trait::async_trait]
impl KeyValueStore for Store {
    async fn ping(&self) -> Result<(), StoreError> {
        self.memory.ping().await?;
        self.sqlite.ping().await
    }

    async fn save<T: Record>(&self, record: &T, namespace: &str) -> Result<String, StoreError> {
        self.sqlite.save(record, namespace).await
    }

    async fn get<T: Record>(&self, id: &str, namespace: &str) -> Result<Option<T>, StoreError> {
        self.sqlite.get(id, namespace).await
    }

    async fn list_ids(&self, namespace: &str) -> Result<Vec<String>, StoreError> {
        self.sqlite.list_ids(namespace).await
    }

    async fn delete(&self, id: &str, namespace: &str) -> Result<u64, StoreError> {
        self.sqlite.delete(id, namespace).await
    }

    async fn publish<T: Record>(&self, stream: &str, record: &T) -> Result<(), StoreError> {
        self.sqlite.publish(stream, record).await
    }
}
