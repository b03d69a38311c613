#![cfg(feature = "sqlite")]

use shop_store::{build_store, Store};
use shop_types::ports::store::KeyValueStore;
use std::env;

#[tokio::test]
async fn builds_sqlite_store_from_env() {
    // Use a temp DB path for isolation.
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop-test.db");
    let url = format!("sqlite://{}", db_path.display());
    env::set_var("DATABASE_URL", &url);

    let store: Store = build_store(Some(&url)).await.expect("build store");
    // basic sanity: ping should succeed and namespaces start empty
    store.ping().await.expect("ping");
    let ids = store.list_ids("product").await.expect("list");
    assert!(ids.is_empty());
}
