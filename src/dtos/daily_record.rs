use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::ledger::{RecordType, Role};
use crate::models::daily_record::DailyRecord;

#[derive(Debug, Deserialize)]
pub struct CreateDailyRecordRequest {
    pub user_id: i64,
    pub quantity: f64,
    pub record_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyRecordQuery {
    pub user_id: Option<i64>,
    pub record_type: Option<RecordType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DailyRecordResponse {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_role: Role,
    pub record_date: NaiveDate,
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
    pub record_type: RecordType,
    pub created_at: DateTime<Utc>,
}

impl From<DailyRecord> for DailyRecordResponse {
    fn from(r: DailyRecord) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            user_name: r.user_name,
            user_role: r.user_role,
            record_date: r.record_date,
            quantity: r.quantity,
            rate: r.rate,
            amount: r.amount,
            record_type: r.record_type,
            created_at: r.created_at,
        }
    }
}
