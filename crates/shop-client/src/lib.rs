//! HTTP clients for the catalog (product-api) and payment services.
//!
//! `CatalogClient` doubles as the payment service's outbound adapter: it
//! implements the `CatalogLookup` port over `GET /products/{id}`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use shop_types::domain::order::{Order, OrderRequest};
use shop_types::domain::product::Product;
use shop_types::ports::catalog::{CatalogLookup, LookupError};

/// Applied when the builder is not given an explicit timeout. Matches the
/// bound the payment service puts on its outbound catalog lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// Body of the `GET /` health endpoint on both services.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub status: bool,
    pub message: String,
    pub service: String,
}

#[derive(Clone)]
pub struct ClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Duration,
    client: Option<reqwest::Client>,
}

impl ClientBuilder {
    fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(Self {
            base,
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
            client: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    fn build_inner(self) -> anyhow::Result<(Url, reqwest::Client)> {
        if let Some(client) = self.client {
            return Ok((self.base, client));
        }

        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        Ok((self.base, builder.build()?))
    }
}

#[derive(Clone)]
pub struct CatalogClientBuilder(ClientBuilder);

#[derive(Clone)]
pub struct CatalogClient {
    base: Url,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<CatalogClientBuilder> {
        Ok(CatalogClientBuilder(ClientBuilder::new(base_url)?))
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn health(&self) -> anyhow::Result<Health> {
        let res = self
            .client
            .get(self.url("")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let res = self
            .client
            .get(self.url("products")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_product(&self, req: CreateProductRequest) -> anyhow::Result<Product> {
        let res = self
            .client
            .post(self.url("products")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_product(&self, id: &str) -> anyhow::Result<Product> {
        let res = self
            .client
            .get(self.url(&format!("products/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn delete_product(&self, id: &str) -> anyhow::Result<()> {
        self.client
            .delete(self.url(&format!("products/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

impl CatalogClientBuilder {
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self(self.0.with_timeout(timeout))
    }

    pub fn with_header(self, key: impl AsRef<str>, value: impl AsRef<str>) -> anyhow::Result<Self> {
        Ok(Self(self.0.with_header(key, value)?))
    }

    pub fn with_reqwest_client(self, client: reqwest::Client) -> Self {
        Self(self.0.with_reqwest_client(client))
    }

    pub fn build(self) -> anyhow::Result<CatalogClient> {
        let (base, client) = self.0.build_inner()?;
        Ok(CatalogClient { base, client })
    }
}

/// Remote-HTTP implementation of the catalog lookup capability. A 404 is an
/// absent product; any other error status or a transport failure means the
/// catalog could not answer.
#[async_trait]
impl CatalogLookup for CatalogClient {
    async fn product(&self, id: &str) -> Result<Option<Product>, LookupError> {
        let url = self
            .url(&format!("products/{id}"))
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let product = res
                    .json()
                    .await
                    .map_err(|e| LookupError::Unavailable(e.to_string()))?;
                Ok(Some(product))
            }
            status => {
                tracing::error!(product_id = %id, status = %status, "catalog lookup rejected");
                Err(LookupError::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

#[derive(Clone)]
pub struct OrdersClientBuilder(ClientBuilder);

#[derive(Clone)]
pub struct OrdersClient {
    base: Url,
    client: reqwest::Client,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<OrdersClientBuilder> {
        Ok(OrdersClientBuilder(ClientBuilder::new(base_url)?))
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn health(&self) -> anyhow::Result<Health> {
        let res = self
            .client
            .get(self.url("")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create_order(&self, req: OrderRequest) -> anyhow::Result<Order> {
        let res = self
            .client
            .post(self.url("orders")?)
            .json(&req)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get_order(&self, id: &str) -> anyhow::Result<Order> {
        let res = self
            .client
            .get(self.url(&format!("orders/{id}"))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let res = self
            .client
            .get(self.url("orders")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

impl OrdersClientBuilder {
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self(self.0.with_timeout(timeout))
    }

    pub fn with_header(self, key: impl AsRef<str>, value: impl AsRef<str>) -> anyhow::Result<Self> {
        Ok(Self(self.0.with_header(key, value)?))
    }

    pub fn with_reqwest_client(self, client: reqwest::Client) -> Self {
        Self(self.0.with_reqwest_client(client))
    }

    pub fn build(self) -> anyhow::Result<OrdersClient> {
        let (base, client) = self.0.build_inner()?;
        Ok(OrdersClient { base, client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use shop_types::domain::order::OrderStatus;

    fn sample_product() -> Product {
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Laptop".into(),
            price: 999.99,
            quantity: 10,
        }
    }

    fn sample_order(product_id: &str) -> Order {
        Order::new(product_id.to_string(), 999.99, 2).unwrap()
    }

    #[tokio::test]
    async fn create_get_delete_product() {
        let server = MockServer::start();
        let product = sample_product();

        let create_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/products")
                .json_body_obj(&CreateProductRequest {
                    name: product.name.clone(),
                    price: product.price,
                    quantity: product.quantity,
                });
            then.status(201).json_body_obj(&product);
        });

        let get_mock = server.mock(|when, then| {
            when.method(GET).path(format!("/products/{}", product.id));
            then.status(200).json_body_obj(&product);
        });

        let delete_mock = server.mock(|when, then| {
            when.method(DELETE).path(format!("/products/{}", product.id));
            then.status(204);
        });

        let client = CatalogClient::new(&server.base_url()).unwrap();
        let created = client
            .create_product(CreateProductRequest {
                name: product.name.clone(),
                price: product.price,
                quantity: product.quantity,
            })
            .await
            .unwrap();
        assert_eq!(created.id, product.id);

        let fetched = client.get_product(&product.id).await.unwrap();
        assert_eq!(fetched.name, product.name);

        client.delete_product(&product.id).await.unwrap();

        create_mock.assert();
        get_mock.assert();
        delete_mock.assert();
    }

    #[tokio::test]
    async fn list_products_and_health() {
        let server = MockServer::start();
        let product = sample_product();

        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body_obj(&vec![product.clone()]);
        });

        let health_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body_obj(&Health {
                status: true,
                message: "Product API is healthy".into(),
                service: "product-api".into(),
            });
        });

        let client = CatalogClient::new(&server.base_url()).unwrap();
        let listed = client.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);

        let health = client.health().await.unwrap();
        assert!(health.status);
        assert_eq!(health.service, "product-api");

        list_mock.assert();
        health_mock.assert();
    }

    #[tokio::test]
    async fn lookup_distinguishes_missing_from_broken() {
        let server = MockServer::start();
        let product = sample_product();

        server.mock(|when, then| {
            when.method(GET).path(format!("/products/{}", product.id));
            then.status(200).json_body_obj(&product);
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/missing");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/broken");
            then.status(500);
        });

        let client = CatalogClient::new(&server.base_url()).unwrap();

        let found = client.product(&product.id).await.unwrap();
        assert_eq!(found.unwrap().id, product.id);

        let missing = client.product("missing").await.unwrap();
        assert!(missing.is_none());

        let broken = client.product("broken").await;
        assert!(matches!(broken, Err(LookupError::UnexpectedStatus(500))));
    }

    #[tokio::test]
    async fn lookup_against_dead_server_is_unavailable() {
        // Nothing listens here; the mock server is never started.
        let client = CatalogClient::new("http://127.0.0.1:9/").unwrap();
        let res = client.product("p1").await;
        assert!(matches!(res, Err(LookupError::Unavailable(_))));
    }

    #[tokio::test]
    async fn create_and_get_order() {
        let server = MockServer::start();
        let product = sample_product();
        let order = sample_order(&product.id);

        let create_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/orders")
                .json_body_obj(&OrderRequest {
                    product_id: product.id.clone(),
                    quantity: 2,
                });
            then.status(201).json_body_obj(&order);
        });

        let get_mock = server.mock(|when, then| {
            when.method(GET).path(format!("/orders/{}", order.id));
            then.status(200).json_body_obj(&order);
        });

        let client = OrdersClient::new(&server.base_url()).unwrap();
        let created = client
            .create_order(OrderRequest {
                product_id: product.id.clone(),
                quantity: 2,
            })
            .await
            .unwrap();
        assert_eq!(created.id, order.id);
        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(created.total, order.total);

        let fetched = client.get_order(&order.id).await.unwrap();
        assert_eq!(fetched.product_id, product.id);

        create_mock.assert();
        get_mock.assert();
    }

    #[tokio::test]
    async fn list_orders_and_health() {
        let server = MockServer::start();
        let order = sample_order("p1");

        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/orders");
            then.status(200).json_body_obj(&vec![order.clone()]);
        });

        let health_mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).json_body_obj(&Health {
                status: true,
                message: "Payment service is healthy".into(),
                service: "payment".into(),
            });
        });

        let client = OrdersClient::new(&server.base_url()).unwrap();
        let listed = client.list_orders().await.unwrap();
        assert_eq!(listed.len(), 1);

        let health = client.health().await.unwrap();
        assert_eq!(health.service, "payment");

        list_mock.assert();
        health_mock.assert();
    }

    #[tokio::test]
    async fn builder_headers_are_sent() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET).path("/products").header("x-api-key", "k1");
            then.status(200).json_body(serde_json::json!([]));
        });

        let client = CatalogClient::builder(&server.base_url())
            .unwrap()
            .with_header("x-api-key", "k1")
            .unwrap()
            .with_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let listed = client.list_products().await.unwrap();
        assert!(listed.is_empty());

        mock.assert();
    }
}
