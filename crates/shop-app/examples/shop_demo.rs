///  To run :
///  cargo r --example shop_demo
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use shop_client::{CatalogClient, CreateProductRequest, OrdersClient};
use shop_hex::application::catalog_service::CatalogService;
use shop_hex::application::completion;
use shop_hex::application::order_service::OrderService;
use shop_hex::inbound::http::{CatalogHttpServer, HttpServerConfig, PaymentHttpServer};
use shop_store::build_store;
use shop_types::domain::order::{OrderRequest, OrderStatus};
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Both services on ephemeral ports, each over its own temp-file SQLite DB
    // so multiple connections see the same data.
    let tmp = tempdir()?;

    let catalog_port = find_free_port();
    let catalog_addr = format!("http://127.0.0.1:{catalog_port}/");
    let catalog_db = format!("sqlite://{}", tmp.path().join("catalog.db").display());
    let catalog_store = Arc::new(build_store(Some(&catalog_db)).await?);
    let catalog_server = CatalogHttpServer::new(
        CatalogService::new(catalog_store),
        HttpServerConfig {
            port: catalog_port.to_string(),
        },
    )
    .await?;
    let catalog_handle = tokio::spawn(async move {
        catalog_server.run().await.expect("catalog server run");
    });

    let payment_port = find_free_port();
    let payment_addr = format!("http://127.0.0.1:{payment_port}/");
    let payment_db = format!("sqlite://{}", tmp.path().join("payment.db").display());
    let order_store = Arc::new(build_store(Some(&payment_db)).await?);
    let lookup = CatalogClient::new(&catalog_addr)?;
    // Short settlement delay so the demo finishes quickly.
    let (queue, worker) = completion::channel(order_store.clone(), Duration::from_secs(1));
    tokio::spawn(worker.run());
    let payment_server = PaymentHttpServer::new(
        OrderService::new(order_store, lookup, queue),
        HttpServerConfig {
            port: payment_port.to_string(),
        },
    )
    .await?;
    let payment_handle = tokio::spawn(async move {
        payment_server.run().await.expect("payment server run");
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Drive the whole flow through the clients.
    let catalog = CatalogClient::new(&catalog_addr)?;
    let orders = OrdersClient::new(&payment_addr)?;

    let product = catalog
        .create_product(CreateProductRequest {
            name: "Laptop".into(),
            price: 999.99,
            quantity: 10,
        })
        .await?;
    println!("Created product id={} price={}", product.id, product.price);

    let order = orders
        .create_order(OrderRequest {
            product_id: product.id.clone(),
            quantity: 2,
        })
        .await?;
    println!(
        "Created order id={} total={} status={:?}",
        order.id, order.total, order.status
    );
    assert_eq!(order.status, OrderStatus::Pending);

    // Settlement runs out of band; poll until the order completes.
    let mut settled = orders.get_order(&order.id).await?;
    for _ in 0..50 {
        if settled.status != OrderStatus::Pending {
            break;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        settled = orders.get_order(&order.id).await?;
    }
    println!("Order settled with status={:?}", settled.status);
    assert_eq!(settled.status, OrderStatus::Completed);

    // Ordering more than the available stock is rejected.
    let err = orders
        .create_order(OrderRequest {
            product_id: product.id.clone(),
            quantity: 100,
        })
        .await
        .expect_err("over-quantity order should be rejected");
    let status = err
        .downcast_ref::<reqwest::Error>()
        .and_then(|e| e.status());
    println!("Over-quantity order rejected with {:?}", status);
    assert_eq!(status, Some(StatusCode::BAD_REQUEST));

    catalog_handle.abort();
    payment_handle.abort();
    Ok(())
}
