use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::ledger::milkman::MilkmanStatus;
use crate::ledger::payment_method::PaymentDetails;
use crate::models::milkman::Milkman;
use crate::models::payment::MilkmanPayment;

#[derive(Debug, Deserialize)]
pub struct MilkmanListQuery {
    pub status: Option<MilkmanStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct BankDetailsRequest {
    pub account_number: String,
    pub ifsc_code: String,
}

#[derive(Debug, Deserialize)]
pub struct PayMilkmanRequest {
    pub amount: f64,
    pub payment_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub details: PaymentDetails,
}

#[derive(Debug, Serialize)]
pub struct MilkmanResponse {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub status: MilkmanStatus,
    pub rating: f64,
    pub available: bool,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub total_due: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Milkman> for MilkmanResponse {
    fn from(m: Milkman) -> Self {
        Self {
            id: m.id,
            name: m.name,
            location: m.location,
            phone: m.phone,
            status: m.status,
            rating: m.rating,
            available: m.available,
            account_number: m.account_number,
            ifsc_code: m.ifsc_code,
            total_due: m.total_due,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MilkmanPaymentResponse {
    pub id: i64,
    pub milkman_id: i64,
    pub amount: f64,
    pub method: String,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<MilkmanPayment> for MilkmanPaymentResponse {
    fn from(p: MilkmanPayment) -> Self {
        Self {
            id: p.id,
            milkman_id: p.milkman_id,
            amount: p.amount,
            method: p.method,
            transaction_id: p.transaction_id,
            payment_date: p.payment_date,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayMilkmanResponse {
    pub payment: MilkmanPaymentResponse,
    pub remaining_due: f64,
}
