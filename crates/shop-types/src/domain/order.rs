use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::ports::store::{self, FieldMap, Record, StoreError};

/// Processing fee charged on every order, as a fraction of the unit price.
pub const PROCESSING_FEE_RATE: f64 = 0.2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "failed" => Ok(OrderStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub product_id: String,
    /// Snapshot of the product price at order time.
    pub price: f64,
    pub fee: f64,
    pub total: f64,
    pub quantity: u32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(product_id: String, price: f64, quantity: u32) -> anyhow::Result<Self> {
        if product_id.trim().is_empty() {
            anyhow::bail!("product_id must not be empty");
        }
        if price <= 0.0 {
            anyhow::bail!("price must be greater than 0");
        }
        if quantity == 0 {
            anyhow::bail!("quantity must be greater than 0");
        }
        let fee = PROCESSING_FEE_RATE * price;
        let total = price * quantity as f64 + fee;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            product_id,
            price,
            fee,
            total,
            quantity,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Inbound order creation payload. The wire field is `id` (the product to
/// order), matching the public API of the payment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "id")]
    pub product_id: String,
    pub quantity: u32,
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        FieldMap::from([
            ("product_id".to_string(), self.product_id.clone()),
            ("price".to_string(), self.price.to_string()),
            ("fee".to_string(), self.fee.to_string()),
            ("total".to_string(), self.total.to_string()),
            ("quantity".to_string(), self.quantity.to_string()),
            ("status".to_string(), self.status.to_string()),
            ("created_at".to_string(), self.created_at.to_rfc3339()),
            ("updated_at".to_string(), self.updated_at.to_rfc3339()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap) -> Result<Self, StoreError> {
        let created_at = parse_timestamp(fields, "created_at")?;
        let updated_at = parse_timestamp(fields, "updated_at")?;
        Ok(Self {
            id: id.to_string(),
            product_id: store::required(fields, "product_id")?.to_string(),
            price: store::parsed(fields, "price")?,
            fee: store::parsed(fields, "fee")?,
            total: store::parsed(fields, "total")?,
            quantity: store::parsed(fields, "quantity")?,
            status: store::parsed(fields, "status")?,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(fields: &FieldMap, name: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw = store::required(fields, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("field `{name}`: {e}")))
}
