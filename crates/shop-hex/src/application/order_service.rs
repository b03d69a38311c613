use std::sync::Arc;

use crate::application::completion::CompletionQueue;
use crate::errors::AppError;
use shop_types::domain::order::{Order, OrderRequest};
use shop_types::ports::catalog::CatalogLookup;
use shop_types::ports::store::{KeyValueStore, StoreError};

pub const ORDER_NAMESPACE: &str = "order";
pub const ORDER_COMPLETED_STREAM: &str = "order_completed";

/// Order workflow engine: validates an order against the catalog, snapshots
/// the price, persists the pending order, and hands its id to the completion
/// queue. Settlement happens out of band; see [`crate::application::completion`].
pub struct OrderService<S: KeyValueStore, C: CatalogLookup> {
    store: Arc<S>,
    catalog: C,
    completions: CompletionQueue,
}

impl<S, C> OrderService<S, C>
where
    S: KeyValueStore,
    C: CatalogLookup,
{
    pub fn new(store: Arc<S>, catalog: C, completions: CompletionQueue) -> Self {
        Self {
            store,
            catalog,
            completions,
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn create_order(&self, request: OrderRequest) -> Result<Order, AppError> {
        let product = self
            .catalog
            .product(&request.product_id)
            .await
            .map_err(|e| {
                tracing::error!(product_id = %request.product_id, error = %e, "catalog lookup failed");
                AppError::Upstream("Failed to fetch product from catalog".into())
            })?
            .ok_or_else(|| {
                AppError::NotFound(format!("Product with ID {} not found", request.product_id))
            })?;

        if product.quantity < request.quantity {
            return Err(AppError::InsufficientStock {
                available: product.quantity,
            });
        }

        let order = Order::new(product.id.clone(), product.price, request.quantity)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.store
            .save(&order, ORDER_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("create order", e))?;

        // Settlement runs after the response; the caller sees the order as
        // pending.
        self.completions.enqueue(order.id.clone());
        tracing::info!(order_id = %order.id, product_id = %order.product_id, "order created");
        Ok(order)
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, AppError> {
        match self
            .store
            .get::<Order>(id, ORDER_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("get order", e))?
        {
            Some(order) => Ok(order),
            None => Err(AppError::NotFound(format!("Order with ID {id} not found"))),
        }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        let ids = self
            .store
            .list_ids(ORDER_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("list orders", e))?;
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            // Skip ids deleted since the scan, as the catalog listing does.
            match self
                .store
                .get::<Order>(&id, ORDER_NAMESPACE)
                .await
                .map_err(|e| AppError::internal("list orders", e))?
            {
                Some(order) => orders.push(order),
                None => continue,
            }
        }
        Ok(orders)
    }
}
