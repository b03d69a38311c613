use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::AppError;
use shop_types::domain::product::Product;
use shop_types::ports::catalog::{CatalogLookup, LookupError};
use shop_types::ports::store::{KeyValueStore, StoreError};

pub const PRODUCT_NAMESPACE: &str = "product";

pub struct CatalogService<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let ids = self
            .store
            .list_ids(PRODUCT_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("list products", e))?;
        let mut products = Vec::with_capacity(ids.len());
        for id in ids {
            // An id deleted since the scan resolves to absence; skip it.
            match self
                .store
                .get::<Product>(&id, PRODUCT_NAMESPACE)
                .await
                .map_err(|e| AppError::internal("list products", e))?
            {
                Some(product) => products.push(product),
                None => continue,
            }
        }
        Ok(products)
    }

    pub async fn create_product(
        &self,
        name: &str,
        price: f64,
        quantity: u32,
    ) -> Result<Product, AppError> {
        let product =
            Product::new(name, price, quantity).map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.store
            .save(&product, PRODUCT_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("create product", e))?;
        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, AppError> {
        match self
            .store
            .get::<Product>(id, PRODUCT_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("get product", e))?
        {
            Some(product) => Ok(product),
            None => Err(AppError::NotFound(format!("Product with ID {id} not found"))),
        }
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), AppError> {
        let removed = self
            .store
            .delete(id, PRODUCT_NAMESPACE)
            .await
            .map_err(|e| AppError::internal("delete product", e))?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Product with ID {id} not found")));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

/// In-process implementation of the catalog capability, for tests and
/// monolith deployments; the payment service normally uses the remote
/// HTTP client instead.
#[async_trait]
impl<S: KeyValueStore> CatalogLookup for CatalogService<S> {
    async fn product(&self, id: &str) -> Result<Option<Product>, LookupError> {
        self.store
            .get::<Product>(id, PRODUCT_NAMESPACE)
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))
    }
}
