#![cfg(feature = "sqlite")]

use shop_store::sqlite::SqliteStore;
use shop_types::domain::order::{Order, OrderStatus};
use shop_types::domain::product::Product;
use shop_types::ports::store::KeyValueStore;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_db_url() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut path = PathBuf::from(dir.path());
    path.push(format!("shop-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    (dir, url)
}

#[tokio::test]
async fn sqlite_store_save_get_list_delete_flow() {
    let (_dir, url) = temp_db_url();
    let store = SqliteStore::new(&url).await.unwrap();

    let product = Product::new("Widget", 5.0, 3).unwrap();
    let id = store.save(&product, "product").await.unwrap();
    assert_eq!(id, product.id);

    let fetched: Product = store.get(&id, "product").await.unwrap().unwrap();
    assert_eq!(fetched, product);

    let ids = store.list_ids("product").await.unwrap();
    assert_eq!(ids, vec![id.clone()]);

    let removed = store.delete(&id, "product").await.unwrap();
    assert_eq!(removed, 1);
    assert!(store
        .get::<Product>(&id, "product")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn sqlite_store_overwrites_and_round_trips_orders() {
    let (_dir, url) = temp_db_url();
    let store = SqliteStore::new(&url).await.unwrap();

    let mut order = Order::new("p1".into(), 999.99, 2).unwrap();
    store.save(&order, "order").await.unwrap();

    order.update_status(OrderStatus::Completed);
    store.save(&order, "order").await.unwrap();

    let fetched: Order = store.get(&order.id, "order").await.unwrap().unwrap();
    assert_eq!(fetched.status, OrderStatus::Completed);
    assert_eq!(fetched.price, order.price);
    assert_eq!(fetched.fee, order.fee);
    assert_eq!(fetched.total, order.total);
    assert_eq!(store.list_ids("order").await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_store_handles_missing_rows_and_streams() {
    let (_dir, url) = temp_db_url();
    let store = SqliteStore::new(&url).await.unwrap();

    let missing: Option<Product> = store.get("nope", "product").await.unwrap();
    assert!(missing.is_none());
    assert_eq!(store.delete("nope", "product").await.unwrap(), 0);
    assert!(store.list_ids("product").await.unwrap().is_empty());

    let order = Order::new("p1".into(), 10.0, 1).unwrap();
    store.publish("order_completed", &order).await.unwrap();
    store.ping().await.unwrap();
}
