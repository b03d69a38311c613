use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;

use super::{apply_middleware, HttpServerConfig};
use crate::application::order_service::OrderService;
use crate::errors::AppError;
use shop_types::domain::order::{Order, OrderRequest};
use shop_types::ports::catalog::CatalogLookup;
use shop_types::ports::store::KeyValueStore;

#[derive(Clone)]
pub struct PaymentHttpServer<S: KeyValueStore, C: CatalogLookup> {
    pub service: Arc<OrderService<S, C>>,
    pub config: HttpServerConfig,
}

impl<S, C> PaymentHttpServer<S, C>
where
    S: KeyValueStore,
    C: CatalogLookup,
{
    pub async fn new(service: OrderService<S, C>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let svc = self.service.clone();
        let app = Router::new()
            .route("/", get(health::<S, C>))
            .route("/orders", get(list_orders::<S, C>))
            .route("/orders", post(create_order::<S, C>))
            .route("/orders/{id}", get(get_order::<S, C>))
            .with_state(svc);
        let app = apply_middleware(app);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting payment service on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health<S: KeyValueStore, C: CatalogLookup>(
    State(service): State<Arc<OrderService<S, C>>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": true,
                "message": "Payment service is healthy",
                "service": "payment"
            })),
        ),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": false,
                    "message": "Service unhealthy - store connection failed",
                    "service": "payment"
                })),
            )
        }
    }
}

async fn list_orders<S: KeyValueStore, C: CatalogLookup>(
    State(service): State<Arc<OrderService<S, C>>>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

async fn create_order<S: KeyValueStore, C: CatalogLookup>(
    State(service): State<Arc<OrderService<S, C>>>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = service.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order<S: KeyValueStore, C: CatalogLookup>(
    State(service): State<Arc<OrderService<S, C>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = service.get_order(&id).await?;
    Ok(Json(order))
}
