//! Pure bookkeeping for the dairy: roles, record kinds, rate snapshots, dues,
//! milkman balances and dashboard aggregates. Nothing in here touches the
//! database; handlers load rows and hand them to these functions.

pub mod dues;
pub mod milkman;
pub mod payment_method;
pub mod rates;
pub mod summary;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Unknown record type '{0}'")]
    UnknownRecordType(String),

    #[error("Unknown milkman status '{0}'")]
    UnknownStatus(String),

    #[error("Rates must be positive numbers")]
    NonPositiveRate,

    #[error("Buyer rate ({buyer}) must be greater than milkman rate ({milkman})")]
    RateOrdering { milkman: f64, buyer: f64 },

    #[error("Quantity must be greater than 0")]
    InvalidQuantity,

    #[error("Amount must be greater than 0")]
    InvalidAmount,

    #[error("Payment of {amount} exceeds outstanding due of {due}")]
    Overpayment { amount: f64, due: f64 },

    #[error("Admins do not have daily records")]
    NoRecordTypeForRole,

    #[error("Rating must be between 0 and 5")]
    InvalidRating,

    #[error("Milkman is not approved")]
    MilkmanNotApproved,

    #[error("Invalid payment details: {0}")]
    InvalidPaymentDetails(String),
}

/// Round a money amount to whole paise.
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Buyer,
    Milkman,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Buyer => "buyer",
            Role::Milkman => "milkman",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "buyer" => Ok(Role::Buyer),
            "milkman" => Ok(Role::Milkman),
            other => Err(LedgerError::UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Direction of milk movement: buyers purchase from the dairy, milkmen
/// supply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Purchase,
    Supply,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Purchase => "purchase",
            RecordType::Supply => "supply",
        }
    }

    pub fn for_role(role: Role) -> Result<Self, LedgerError> {
        match role {
            Role::Buyer => Ok(RecordType::Purchase),
            Role::Milkman => Ok(RecordType::Supply),
            Role::Admin => Err(LedgerError::NoRecordTypeForRole),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(RecordType::Purchase),
            "supply" => Ok(RecordType::Supply),
            other => Err(LedgerError::UnknownRecordType(other.to_string())),
        }
    }
}

impl TryFrom<String> for RecordType {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
