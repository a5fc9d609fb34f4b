use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

use crate::ledger::payment_method::PaymentDetails;
use crate::models::payment::Payment;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Required when an admin records a payment on a buyer's behalf.
    pub buyer_id: Option<i64>,
    pub amount: f64,
    pub payment_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub details: PaymentDetails,
}

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub buyer_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub buyer_id: i64,
    pub amount: f64,
    pub method: String,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            buyer_id: p.buyer_id,
            amount: p.amount,
            method: p.method,
            transaction_id: p.transaction_id,
            payment_date: p.payment_date,
            created_at: p.created_at,
        }
    }
}
