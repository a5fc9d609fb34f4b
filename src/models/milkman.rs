use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::ledger::milkman::MilkmanStatus;

/// Shares its id with the milkman's profile.
#[derive(Debug, Clone, FromRow)]
pub struct Milkman {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub status: MilkmanStatus,
    pub rating: f64,
    pub available: bool,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub total_due: f64,
    pub created_at: DateTime<Utc>,
}

pub const MILKMAN_COLUMNS: &str = "id, name, location, phone, status,
    rating::FLOAT8 AS rating, available, account_number, ifsc_code,
    total_due::FLOAT8 AS total_due, created_at";
