use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::ledger::{RecordType, Role};

#[derive(Debug, Clone, FromRow)]
pub struct DailyRecord {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    #[sqlx(try_from = "String")]
    pub user_role: Role,
    pub record_date: NaiveDate,
    pub quantity: f64,
    /// Rate in force when the record was written.
    pub rate: f64,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub record_type: RecordType,
    pub created_at: DateTime<Utc>,
}

pub const DAILY_RECORD_COLUMNS: &str = "id, user_id, user_name, user_role, record_date,
    quantity::FLOAT8 AS quantity, rate::FLOAT8 AS rate, amount::FLOAT8 AS amount,
    record_type, created_at";
