use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Buyer to dairy.
#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub id: i64,
    pub buyer_id: i64,
    pub amount: f64,
    pub method: String,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Dairy to milkman.
#[derive(Debug, Clone, FromRow)]
pub struct MilkmanPayment {
    pub id: i64,
    pub milkman_id: i64,
    pub amount: f64,
    pub method: String,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

pub const PAYMENT_COLUMNS: &str =
    "id, buyer_id, amount::FLOAT8 AS amount, method, transaction_id, payment_date, created_at";

pub const MILKMAN_PAYMENT_COLUMNS: &str =
    "id, milkman_id, amount::FLOAT8 AS amount, method, transaction_id, payment_date, created_at";
