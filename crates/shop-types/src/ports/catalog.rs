use async_trait::async_trait;

use crate::domain::product::Product;

#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("catalog answered with status {0}")]
    UnexpectedStatus(u16),
}

/// Catalog lookup capability used by the order workflow. The payment service
/// wires in the remote HTTP implementation; an in-process implementation over
/// the store exists for tests and monolith deployments.
///
/// A product that does not exist is `Ok(None)`; `Err` means the catalog could
/// not answer at all (unreachable, timed out, or replied with an unexpected
/// status).
#[async_trait]
pub trait CatalogLookup: Send + Sync + 'static {
    async fn product(&self, id: &str) -> Result<Option<Product>, LookupError>;
}

#[async_trait]
impl<T: CatalogLookup + ?Sized> CatalogLookup for std::sync::Arc<T> {
    async fn product(&self, id: &str) -> Result<Option<Product>, LookupError> {
        (**self).product(id).await
    }
}
