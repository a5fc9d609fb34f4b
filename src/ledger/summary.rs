use serde::Serialize;

use super::dues::{due_for, reconcile_dues, total_outstanding, DueSummary};
use super::milkman::MilkmanStatus;
use super::{round_money, RecordType};
use crate::models::daily_record::DailyRecord;
use crate::models::milkman::Milkman;
use crate::models::payment::{MilkmanPayment, Payment};
use crate::models::product::ProductSale;

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct MilkmanCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct AdminSummary {
    pub total_milk_collected: f64,
    pub total_milk_sold: f64,
    pub milk_revenue: f64,
    pub milk_cost: f64,
    pub product_revenue: f64,
    pub payments_received: f64,
    pub paid_to_milkmen: f64,
    pub outstanding_dues: f64,
    pub profit: f64,
    pub milkmen: MilkmanCounts,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct BuyerSummary {
    pub total_quantity: f64,
    pub record_count: usize,
    #[serde(flatten)]
    pub dues: DueSummary,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct MilkmanSummary {
    pub total_supplied: f64,
    pub delivery_count: usize,
    pub total_earnings: f64,
    pub total_paid: f64,
    pub total_due: f64,
}

pub struct AdminLedgers<'a> {
    pub records: &'a [DailyRecord],
    pub payments: &'a [Payment],
    pub milkman_payments: &'a [MilkmanPayment],
    pub product_sales: &'a [ProductSale],
    pub milkmen: &'a [Milkman],
}

impl AdminSummary {
    pub fn compute(ledgers: &AdminLedgers<'_>) -> Self {
        let mut summary = AdminSummary::default();

        for record in ledgers.records {
            match record.record_type {
                RecordType::Supply => {
                    summary.total_milk_collected += record.quantity;
                    summary.milk_cost += record.amount;
                }
                RecordType::Purchase => {
                    summary.total_milk_sold += record.quantity;
                    summary.milk_revenue += record.amount;
                }
            }
        }

        summary.product_revenue = ledgers.product_sales.iter().map(|s| s.amount).sum();
        summary.payments_received = ledgers.payments.iter().map(|p| p.amount).sum();
        summary.paid_to_milkmen = ledgers.milkman_payments.iter().map(|p| p.amount).sum();
        summary.outstanding_dues = total_outstanding(&reconcile_dues(ledgers.records, ledgers.payments));

        for milkman in ledgers.milkmen {
            match milkman.status {
                MilkmanStatus::Pending => summary.milkmen.pending += 1,
                MilkmanStatus::Approved => summary.milkmen.approved += 1,
                MilkmanStatus::Rejected => summary.milkmen.rejected += 1,
            }
        }

        summary.total_milk_collected = round_money(summary.total_milk_collected);
        summary.total_milk_sold = round_money(summary.total_milk_sold);
        summary.milk_revenue = round_money(summary.milk_revenue);
        summary.milk_cost = round_money(summary.milk_cost);
        summary.product_revenue = round_money(summary.product_revenue);
        summary.payments_received = round_money(summary.payments_received);
        summary.paid_to_milkmen = round_money(summary.paid_to_milkmen);
        summary.profit = round_money(summary.milk_revenue + summary.product_revenue - summary.milk_cost);
        summary
    }
}

impl BuyerSummary {
    pub fn compute(buyer_id: i64, records: &[DailyRecord], payments: &[Payment]) -> Self {
        let purchases: Vec<&DailyRecord> = records
            .iter()
            .filter(|r| r.user_id == buyer_id && r.record_type == RecordType::Purchase)
            .collect();

        BuyerSummary {
            total_quantity: round_money(purchases.iter().map(|r| r.quantity).sum()),
            record_count: purchases.len(),
            dues: due_for(buyer_id, purchases, payments),
        }
    }
}

impl MilkmanSummary {
    /// `total_due` is the cached balance on the milkman row; the ledgers
    /// give the earnings and payouts behind it.
    pub fn compute(milkman: &Milkman, records: &[DailyRecord], payouts: &[MilkmanPayment]) -> Self {
        let supplies = records
            .iter()
            .filter(|r| r.user_id == milkman.id && r.record_type == RecordType::Supply);

        let mut summary = MilkmanSummary {
            total_due: milkman.total_due,
            ..Default::default()
        };
        for record in supplies {
            summary.total_supplied += record.quantity;
            summary.total_earnings += record.amount;
            summary.delivery_count += 1;
        }
        summary.total_paid = round_money(
            payouts
                .iter()
                .filter(|p| p.milkman_id == milkman.id)
                .map(|p| p.amount)
                .sum(),
        );
        summary.total_supplied = round_money(summary.total_supplied);
        summary.total_earnings = round_money(summary.total_earnings);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::dues::tests::{payment, record};
    use chrono::{NaiveDate, Utc};

    fn milkman(id: i64, status: MilkmanStatus, total_due: f64) -> Milkman {
        Milkman {
            id,
            name: format!("milkman{id}"),
            location: "Village".into(),
            phone: "9999999999".into(),
            status,
            rating: 4.5,
            available: true,
            account_number: None,
            ifsc_code: None,
            total_due,
            created_at: Utc::now(),
        }
    }

    fn payout(milkman_id: i64, amount: f64) -> MilkmanPayment {
        MilkmanPayment {
            id: 0,
            milkman_id,
            amount,
            method: "net_banking".into(),
            transaction_id: "TXN1".into(),
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn sale(amount: f64) -> ProductSale {
        ProductSale {
            id: 0,
            product_id: 1,
            product_name: "Ghee".into(),
            buyer_id: None,
            quantity: 1.0,
            price: amount,
            amount,
            sale_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn admin_profit_is_revenue_minus_milk_cost() {
        let records = vec![
            record(1, 20.0, 50.0, RecordType::Supply),
            record(2, 10.0, 60.0, RecordType::Purchase),
            record(3, 5.0, 60.0, RecordType::Purchase),
        ];
        let payments = vec![payment(2, 600.0), payment(3, 400.0)];
        let milkmen = vec![
            milkman(1, MilkmanStatus::Approved, 1000.0),
            milkman(5, MilkmanStatus::Pending, 0.0),
        ];
        let summary = AdminSummary::compute(&AdminLedgers {
            records: &records,
            payments: &payments,
            milkman_payments: &[payout(1, 300.0)],
            product_sales: &[sale(250.0)],
            milkmen: &milkmen,
        });

        assert_eq!(summary.total_milk_collected, 20.0);
        assert_eq!(summary.total_milk_sold, 15.0);
        assert_eq!(summary.milk_revenue, 900.0);
        assert_eq!(summary.milk_cost, 1000.0);
        assert_eq!(summary.product_revenue, 250.0);
        assert_eq!(summary.profit, 150.0);
        assert_eq!(summary.payments_received, 1000.0);
        assert_eq!(summary.paid_to_milkmen, 300.0);
        // buyer 3 has 100 of credit, which does not reduce buyer 2's due
        assert_eq!(summary.outstanding_dues, 0.0);
        assert_eq!(summary.milkmen, MilkmanCounts { pending: 1, approved: 1, rejected: 0 });
    }

    #[test]
    fn buyer_summary_only_counts_own_purchases() {
        let records = vec![
            record(2, 10.0, 70.0, RecordType::Purchase),
            record(2, 5.0, 70.0, RecordType::Purchase),
            record(8, 1.0, 70.0, RecordType::Purchase),
        ];
        let summary = BuyerSummary::compute(2, &records, &[payment(2, 500.0), payment(8, 70.0)]);
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.total_quantity, 15.0);
        assert_eq!(summary.dues.due, 550.0);
    }

    #[test]
    fn milkman_summary_uses_cached_due() {
        let m = milkman(1, MilkmanStatus::Approved, 700.0);
        let records = vec![
            record(1, 10.0, 50.0, RecordType::Supply),
            record(1, 10.0, 50.0, RecordType::Supply),
            record(4, 10.0, 50.0, RecordType::Supply),
        ];
        let summary = MilkmanSummary::compute(&m, &records, &[payout(1, 300.0), payout(4, 10.0)]);
        assert_eq!(summary.delivery_count, 2);
        assert_eq!(summary.total_supplied, 20.0);
        assert_eq!(summary.total_earnings, 1000.0);
        assert_eq!(summary.total_paid, 300.0);
        assert_eq!(summary.total_due, 700.0);
    }
}
