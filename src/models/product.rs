use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductSale {
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

pub const PRODUCT_COLUMNS: &str = "id, name,
    price::FLOAT8 AS price,
    stock::FLOAT8 AS stock,
    unit, created_at";

pub const PRODUCT_SALE_COLUMNS: &str = "id, product_id, product_name, buyer_id,
    quantity::FLOAT8 AS quantity, price::FLOAT8 AS price, amount::FLOAT8 AS amount,
    sale_date, created_at";
