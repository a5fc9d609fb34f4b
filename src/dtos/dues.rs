use serde::Serialize;

use crate::ledger::dues::DueSummary;

#[derive(Debug, Serialize)]
pub struct BuyerDueResponse {
    pub buyer_id: i64,
    /// Display only.
    pub buyer_name: String,
    #[serde(flatten)]
    pub summary: DueSummary,
}

#[derive(Debug, Serialize)]
pub struct DuesOverview {
    pub buyers: Vec<BuyerDueResponse>,
    pub total_outstanding: f64,
}
