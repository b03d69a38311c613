use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    serve, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

use super::{apply_middleware, HttpServerConfig};
use crate::application::catalog_service::CatalogService;
use crate::errors::AppError;
use shop_types::domain::product::Product;
use shop_types::ports::store::KeyValueStore;

#[derive(Clone)]
pub struct CatalogHttpServer<S: KeyValueStore> {
    pub service: Arc<CatalogService<S>>,
    pub config: HttpServerConfig,
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl<S: KeyValueStore> CatalogHttpServer<S> {
    pub async fn new(service: CatalogService<S>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let svc = self.service.clone();
        let app = Router::new()
            .route("/", get(health::<S>))
            .route("/products", get(list_products::<S>))
            .route("/products", post(create_product::<S>))
            .route("/products/{id}", get(get_product::<S>))
            .route("/products/{id}", delete(delete_product::<S>))
            .with_state(svc);
        let app = apply_middleware(app);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting product api on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health<S: KeyValueStore>(
    State(service): State<Arc<CatalogService<S>>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": true,
                "message": "Product API is healthy",
                "service": "product-api"
            })),
        ),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": false,
                    "message": "Service unhealthy - store connection failed",
                    "service": "product-api"
                })),
            )
        }
    }
}

async fn list_products<S: KeyValueStore>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

async fn create_product<S: KeyValueStore>(
    State(service): State<Arc<CatalogService<S>>>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = service
        .create_product(&payload.name, payload.price, payload.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product<S: KeyValueStore>(
    State(service): State<Arc<CatalogService<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = service.get_product(&id).await?;
    Ok(Json(product))
}

async fn delete_product<S: KeyValueStore>(
    State(service): State<Arc<CatalogService<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
