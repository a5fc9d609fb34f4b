use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rates::positive_cents;
use super::{round_money, LedgerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkmanStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilkmanAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed(MilkmanStatus),
    Unchanged,
}

impl MilkmanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilkmanStatus::Pending => "pending",
            MilkmanStatus::Approved => "approved",
            MilkmanStatus::Rejected => "rejected",
        }
    }

    /// Re-applying the current decision is a no-op. An admin may reverse a
    /// decision (approve a rejected milkman, or reject an approved one).
    pub fn transition(self, action: MilkmanAction) -> Transition {
        let target = match action {
            MilkmanAction::Approve => MilkmanStatus::Approved,
            MilkmanAction::Reject => MilkmanStatus::Rejected,
        };
        if self == target {
            Transition::Unchanged
        } else {
            Transition::Changed(target)
        }
    }

    pub fn ensure_approved(self) -> Result<(), LedgerError> {
        match self {
            MilkmanStatus::Approved => Ok(()),
            _ => Err(LedgerError::MilkmanNotApproved),
        }
    }
}

impl fmt::Display for MilkmanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilkmanStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MilkmanStatus::Pending),
            "approved" => Ok(MilkmanStatus::Approved),
            "rejected" => Ok(MilkmanStatus::Rejected),
            other => Err(LedgerError::UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for MilkmanStatus {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// New cached due after the dairy pays a milkman. The due never goes below
/// zero: the dairy does not pay ahead of supplies.
pub fn apply_payment(total_due: f64, amount: f64) -> Result<f64, LedgerError> {
    // checked after rounding: a sub-paisa amount would be written as zero
    let amount = positive_cents(amount).ok_or(LedgerError::InvalidAmount)?;
    if amount > round_money(total_due) {
        return Err(LedgerError::Overpayment { amount, due: total_due });
    }
    Ok(round_money(total_due - amount))
}

/// Admin-assigned rating, stored with two decimals on a 0 to 5 scale.
pub fn validate_rating(rating: f64) -> Result<f64, LedgerError> {
    if !rating.is_finite() {
        return Err(LedgerError::InvalidRating);
    }
    let rating = round_money(rating);
    if !(0.0..=5.0).contains(&rating) {
        return Err(LedgerError::InvalidRating);
    }
    Ok(rating)
}

/// New cached due after a supply record is written for the milkman.
pub fn accrue_supply(total_due: f64, supply_amount: f64) -> f64 {
    round_money(total_due + supply_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_pending_then_reapprove_is_noop() {
        let status = MilkmanStatus::Pending;
        let Transition::Changed(status) = status.transition(MilkmanAction::Approve) else {
            panic!("pending milkman should change on approval");
        };
        assert_eq!(status, MilkmanStatus::Approved);
        assert_eq!(status.transition(MilkmanAction::Approve), Transition::Unchanged);
    }

    #[test]
    fn reject_and_reverse() {
        assert_eq!(
            MilkmanStatus::Pending.transition(MilkmanAction::Reject),
            Transition::Changed(MilkmanStatus::Rejected)
        );
        assert_eq!(
            MilkmanStatus::Rejected.transition(MilkmanAction::Approve),
            Transition::Changed(MilkmanStatus::Approved)
        );
        assert_eq!(MilkmanStatus::Rejected.transition(MilkmanAction::Reject), Transition::Unchanged);
    }

    #[test]
    fn only_approved_milkmen_transact() {
        assert!(MilkmanStatus::Approved.ensure_approved().is_ok());
        assert_eq!(
            MilkmanStatus::Pending.ensure_approved(),
            Err(LedgerError::MilkmanNotApproved)
        );
    }

    #[test]
    fn payment_reduces_due_by_exact_amount() {
        assert_eq!(apply_payment(1500.0, 400.0), Ok(1100.0));
        assert_eq!(apply_payment(1500.0, 1500.0), Ok(0.0));
    }

    #[test]
    fn payment_cannot_exceed_due() {
        assert_eq!(
            apply_payment(100.0, 100.5),
            Err(LedgerError::Overpayment { amount: 100.5, due: 100.0 })
        );
        assert_eq!(apply_payment(100.0, 0.0), Err(LedgerError::InvalidAmount));
        assert_eq!(apply_payment(100.0, -5.0), Err(LedgerError::InvalidAmount));
        assert_eq!(apply_payment(100.0, 0.004), Err(LedgerError::InvalidAmount));
        assert_eq!(apply_payment(100.0, f64::INFINITY), Err(LedgerError::InvalidAmount));
    }

    #[test]
    fn rating_stays_on_scale() {
        assert_eq!(validate_rating(4.5), Ok(4.5));
        assert_eq!(validate_rating(0.0), Ok(0.0));
        assert_eq!(validate_rating(3.333), Ok(3.33));
        assert_eq!(validate_rating(5.01), Err(LedgerError::InvalidRating));
        assert_eq!(validate_rating(-0.5), Err(LedgerError::InvalidRating));
        assert_eq!(validate_rating(f64::NAN), Err(LedgerError::InvalidRating));
    }

    #[test]
    fn supplies_accrue_into_due() {
        let due = accrue_supply(0.0, 500.0);
        let due = accrue_supply(due, 250.25);
        assert_eq!(due, 750.25);
        assert_eq!(apply_payment(due, 750.25), Ok(0.0));
    }
}
