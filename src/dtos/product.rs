use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::product::{Product, ProductSale};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub stock: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            stock: product.stock,
            unit: product.unit,
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductSaleRequest {
    pub product_id: i64,
    pub quantity: f64,
    pub buyer_id: Option<i64>,
    pub sale_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ProductSaleResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub buyer_id: Option<i64>,
    pub quantity: f64,
    pub price: f64,
    pub amount: f64,
    pub sale_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<ProductSale> for ProductSaleResponse {
    fn from(s: ProductSale) -> Self {
        Self {
            id: s.id,
            product_id: s.product_id,
            product_name: s.product_name,
            buyer_id: s.buyer_id,
            quantity: s.quantity,
            price: s.price,
            amount: s.amount,
            sale_date: s.sale_date,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn product_timestamp_serializes_like_other_responses() {
        let product = Product {
            id: 3,
            name: "Paneer".into(),
            price: 90.0,
            stock: 12.0,
            unit: "kg".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap(),
        };
        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();
        assert_eq!(json["created_at"], "2024-03-01T06:30:00Z");
        assert_eq!(json["unit"], "kg");
    }
}
