use std::sync::Arc;
use std::time::Duration;

use shop_client::CatalogClient;
use shop_hex::application::completion;
use shop_hex::application::order_service::OrderService;
use shop_hex::config::Config;
use shop_hex::inbound::http::{HttpServerConfig, PaymentHttpServer};
use shop_store::build_store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / CATALOG_BASE_URL when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let store = Arc::new(build_store(config.database_url.as_deref()).await?);
    let catalog = CatalogClient::new(&config.catalog_base_url)?;

    let (queue, worker) = completion::channel(
        store.clone(),
        Duration::from_secs(config.settlement_delay_secs),
    );
    tokio::spawn(worker.run());

    let service = OrderService::new(store, catalog, queue);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = PaymentHttpServer::new(service, server_cfg).await?;
    http.run().await
}
