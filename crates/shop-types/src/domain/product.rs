use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::store::{self, FieldMap, Record, StoreError};

pub const MAX_NAME_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl Product {
    pub fn new(name: &str, price: f64, quantity: u32) -> anyhow::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("name must not be empty");
        }
        if name.chars().count() > MAX_NAME_LEN {
            anyhow::bail!("name must be at most {MAX_NAME_LEN} characters");
        }
        if price <= 0.0 {
            anyhow::bail!("price must be greater than 0");
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price,
            quantity,
        })
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        FieldMap::from([
            ("name".to_string(), self.name.clone()),
            ("price".to_string(), self.price.to_string()),
            ("quantity".to_string(), self.quantity.to_string()),
        ])
    }

    fn from_fields(id: &str, fields: &FieldMap) -> Result<Self, StoreError> {
        Ok(Self {
            id: id.to_string(),
            name: store::required(fields, "name")?.to_string(),
            price: store::parsed(fields, "price")?,
            quantity: store::parsed(fields, "quantity")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_trims_name_and_assigns_id() {
        let product = Product::new("  Laptop  ", 999.99, 10).unwrap();
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price, 999.99);
        assert_eq!(product.quantity, 10);
        assert!(!product.id.is_empty());
    }

    #[test]
    fn validation_errors() {
        assert!(Product::new("", 1.0, 1).is_err());
        assert!(Product::new("   ", 1.0, 1).is_err());
        assert!(Product::new(&"x".repeat(MAX_NAME_LEN + 1), 1.0, 1).is_err());
        assert!(Product::new("Laptop", 0.0, 1).is_err());
        assert!(Product::new("Laptop", -5.0, 1).is_err());
        // zero quantity is a valid product (out of stock)
        assert!(Product::new("Laptop", 1.0, 0).is_ok());
    }

    #[test]
    fn field_map_round_trip() {
        let product = Product::new("Laptop", 999.99, 10).unwrap();
        let fields = product.to_fields();
        let decoded = Product::from_fields(&product.id, &fields).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn corrupt_field_maps_are_rejected() {
        let mut fields = Product::new("Laptop", 1.0, 1).unwrap().to_fields();
        fields.remove("price");
        assert!(matches!(
            Product::from_fields("p1", &fields),
            Err(StoreError::Corrupt(_))
        ));

        let mut fields = Product::new("Laptop", 1.0, 1).unwrap().to_fields();
        fields.insert("quantity".into(), "lots".into());
        assert!(matches!(
            Product::from_fields("p1", &fields),
            Err(StoreError::Corrupt(_))
        ));
    }
}
