use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::ledger::rates::DairyRates;
use crate::ledger::LedgerError;

#[derive(Debug, FromRow)]
pub struct RatesRow {
    pub milkman_rate: f64,
    pub buyer_rate: f64,
    pub updated_at: DateTime<Utc>,
}

impl RatesRow {
    pub fn rates(&self) -> Result<DairyRates, LedgerError> {
        DairyRates::new(self.milkman_rate, self.buyer_rate)
    }
}

pub const RATES_COLUMNS: &str =
    "milkman_rate::FLOAT8 AS milkman_rate, buyer_rate::FLOAT8 AS buyer_rate, updated_at";
