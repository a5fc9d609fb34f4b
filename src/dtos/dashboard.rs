use serde::Serialize;

use crate::dtos::daily_record::DailyRecordResponse;
use crate::dtos::milkman::MilkmanResponse;
use crate::ledger::summary::{AdminSummary, BuyerSummary, MilkmanSummary};

#[derive(Serialize)]
pub struct AdminDashboard {
    pub summary: AdminSummary,
    pub buyer_rate: f64,
    pub milkman_rate: f64,
    pub pending_milkmen: Vec<MilkmanResponse>,
}

#[derive(Serialize)]
pub struct BuyerDashboard {
    pub summary: BuyerSummary,
    pub buyer_rate: f64,
    pub recent_purchases: Vec<DailyRecordResponse>,
}

#[derive(Serialize)]
pub struct MilkmanDashboard {
    pub profile: MilkmanResponse,
    pub summary: MilkmanSummary,
    pub milkman_rate: f64,
    pub recent_deliveries: Vec<DailyRecordResponse>,
}
