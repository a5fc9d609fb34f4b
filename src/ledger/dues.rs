//! Buyer dues, always derived from the purchase and payment ledgers.
//!
//! Every caller groups by the buyer's profile id. Names are attached later
//! for display and never used to join the two ledgers.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{round_money, RecordType};
use crate::models::daily_record::DailyRecord;
use crate::models::payment::Payment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DueSummary {
    pub total_purchases: f64,
    pub total_payments: f64,
    /// Negative when the buyer has paid ahead; reported as credit, not clamped.
    pub due: f64,
}

impl DueSummary {
    fn settle(mut self) -> Self {
        self.total_purchases = round_money(self.total_purchases);
        self.total_payments = round_money(self.total_payments);
        self.due = round_money(self.total_purchases - self.total_payments);
        self
    }
}

pub fn reconcile_dues<'a, R, P>(records: R, payments: P) -> BTreeMap<i64, DueSummary>
where
    R: IntoIterator<Item = &'a DailyRecord>,
    P: IntoIterator<Item = &'a Payment>,
{
    let mut dues: BTreeMap<i64, DueSummary> = BTreeMap::new();

    for record in records.into_iter().filter(|r| r.record_type == RecordType::Purchase) {
        dues.entry(record.user_id).or_default().total_purchases += record.amount;
    }
    for payment in payments {
        dues.entry(payment.buyer_id).or_default().total_payments += payment.amount;
    }

    dues.into_iter().map(|(buyer, summary)| (buyer, summary.settle())).collect()
}

pub fn due_for<'a, R, P>(buyer_id: i64, records: R, payments: P) -> DueSummary
where
    R: IntoIterator<Item = &'a DailyRecord>,
    P: IntoIterator<Item = &'a Payment>,
{
    let records = records.into_iter().filter(|r| r.user_id == buyer_id);
    let payments = payments.into_iter().filter(|p| p.buyer_id == buyer_id);
    reconcile_dues(records, payments)
        .remove(&buyer_id)
        .unwrap_or_default()
}

/// Sum of what buyers still owe; credit balances do not offset other buyers.
pub fn total_outstanding(dues: &BTreeMap<i64, DueSummary>) -> f64 {
    round_money(dues.values().map(|d| d.due.max(0.0)).sum())
}
