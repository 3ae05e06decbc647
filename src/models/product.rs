use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry for a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub category_id: String,
    pub price: Decimal, // NUMERIC(10, 2) in database
}

impl Product {
    pub fn new(product_id: &str, product_name: &str, category_id: &str, price: Decimal) -> Self {
        Self {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            category_id: category_id.to_string(),
            price,
        }
    }
}

/// Quantity recorded by a single sales row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SaleQuantity {
    pub product_id: String,
    pub quantity: i32,
}

impl SaleQuantity {
    pub fn new(product_id: &str, quantity: i32) -> Self {
        Self {
            product_id: product_id.to_string(),
            quantity,
        }
    }
}

/// One product's (price, total units sold) observation.
///
/// Only products with at least one recorded sale have a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductDemandPoint {
    pub product_id: String,
    pub price: Decimal,
    pub total_units_sold: i64,
}

impl ProductDemandPoint {
    pub fn new(product_id: &str, price: Decimal, total_units_sold: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            price,
            total_units_sold,
        }
    }
}

/// Identity and price shown on the product details page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductInfo {
    pub product_id: String,
    pub product_name: String,
    pub price: Decimal,
}
