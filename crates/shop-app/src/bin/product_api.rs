use std::sync::Arc;

use shop_hex::application::catalog_service::CatalogService;
use shop_hex::config::Config;
use shop_hex::inbound::http::{CatalogHttpServer, HttpServerConfig};
use shop_store::{build_store, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let store: Store = build_store(config.database_url.as_deref()).await?;
    let service = CatalogService::new(Arc::new(store));

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = CatalogHttpServer::new(service, server_cfg).await?;
    http.run().await
}
