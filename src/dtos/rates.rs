use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::rates::RatesRow;

#[derive(Debug, Deserialize)]
pub struct SetRatesRequest {
    pub milkman_rate: f64,
    pub buyer_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct RatesResponse {
    pub milkman_rate: f64,
    pub buyer_rate: f64,
    pub margin: f64,
    pub updated_at: DateTime<Utc>,
}

impl From<RatesRow> for RatesResponse {
    fn from(row: RatesRow) -> Self {
        Self {
            milkman_rate: row.milkman_rate,
            buyer_rate: row.buyer_rate,
            margin: crate::ledger::round_money(row.buyer_rate - row.milkman_rate),
            updated_at: row.updated_at,
        }
    }
}
