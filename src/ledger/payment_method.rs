//! Payment method input and synthetic transaction ids. No gateway is
//! involved; the details are validated, reduced to a method name and a
//! transaction id, and dropped.

use std::fmt;

use serde::Deserialize;
use uuid::Uuid;

use super::LedgerError;

#[derive(Clone, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentDetails {
    Upi { upi_id: String },
    Card { card_number: String, expiry: String, cvv: String },
    NetBanking { bank: String },
    Cash,
}

// Card fields must never reach the logs.
impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentDetails::Upi { upi_id } => f.debug_struct("Upi").field("upi_id", upi_id).finish(),
            PaymentDetails::Card { .. } => f.write_str("Card { .. }"),
            PaymentDetails::NetBanking { bank } => f.debug_struct("NetBanking").field("bank", bank).finish(),
            PaymentDetails::Cash => f.write_str("Cash"),
        }
    }
}

impl PaymentDetails {
    pub fn method_name(&self) -> &'static str {
        match self {
            PaymentDetails::Upi { .. } => "upi",
            PaymentDetails::Card { .. } => "card",
            PaymentDetails::NetBanking { .. } => "net_banking",
            PaymentDetails::Cash => "cash",
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        match self {
            PaymentDetails::Upi { upi_id } => validate_upi(upi_id),
            PaymentDetails::Card { card_number, expiry, cvv } => {
                validate_card_number(card_number)?;
                validate_expiry(expiry)?;
                if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid("CVV must be 3 or 4 digits"));
                }
                Ok(())
            }
            PaymentDetails::NetBanking { bank } => {
                if bank.trim().is_empty() {
                    return Err(invalid("Bank is required"));
                }
                Ok(())
            }
            PaymentDetails::Cash => Ok(()),
        }
    }
}

pub fn transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("TXN{}", &hex[..16])
}

fn invalid(msg: &str) -> LedgerError {
    LedgerError::InvalidPaymentDetails(msg.to_string())
}

fn validate_upi(upi_id: &str) -> Result<(), LedgerError> {
    let Some((name, provider)) = upi_id.trim().split_once('@') else {
        return Err(invalid("UPI id must look like name@provider"));
    };
    let ok_part = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if !ok_part(name) || !ok_part(provider) {
        return Err(invalid("UPI id must look like name@provider"));
    }
    Ok(())
}

fn validate_card_number(number: &str) -> Result<(), LedgerError> {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or_else(|| invalid("Card number must contain only digits"))?;

    if !(12..=19).contains(&digits.len()) {
        return Err(invalid("Card number must be 12 to 19 digits"));
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    if checksum % 10 != 0 {
        return Err(invalid("Card number failed checksum"));
    }
    Ok(())
}

fn validate_expiry(expiry: &str) -> Result<(), LedgerError> {
    let (month, year) = expiry
        .split_once('/')
        .ok_or_else(|| invalid("Expiry must be MM/YY"))?;
    let month: u32 = month.parse().map_err(|_| invalid("Expiry must be MM/YY"))?;
    if year.len() != 2 || year.parse::<u32>().is_err() || !(1..=12).contains(&month) {
        return Err(invalid("Expiry must be MM/YY"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str, expiry: &str, cvv: &str) -> PaymentDetails {
        PaymentDetails::Card {
            card_number: number.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    #[test]
    fn deserializes_tagged_method() {
        let details: PaymentDetails =
            serde_json::from_value(serde_json::json!({ "method": "upi", "upi_id": "ravi@okbank" })).unwrap();
        assert_eq!(details.method_name(), "upi");
        assert!(details.validate().is_ok());

        let cash: PaymentDetails = serde_json::from_value(serde_json::json!({ "method": "cash" })).unwrap();
        assert_eq!(cash.method_name(), "cash");
    }

    #[test]
    fn rejects_malformed_upi() {
        for bad in ["ravi", "@okbank", "ravi@", "ra vi@okbank"] {
            let details = PaymentDetails::Upi { upi_id: bad.into() };
            assert!(details.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn card_checks_luhn_expiry_and_cvv() {
        assert!(card("4111 1111 1111 1111", "12/29", "123").validate().is_ok());
        assert!(card("4111 1111 1111 1112", "12/29", "123").validate().is_err());
        assert!(card("4111111111111111", "13/29", "123").validate().is_err());
        assert!(card("4111111111111111", "12/2029", "123").validate().is_err());
        assert!(card("4111111111111111", "12/29", "12").validate().is_err());
        assert!(card("4111-1111-1111-1111", "12/29", "123").validate().is_err());
    }

    #[test]
    fn debug_hides_card_details() {
        let printed = format!("{:?}", card("4111111111111111", "12/29", "123"));
        assert!(!printed.contains("4111"));
        assert!(!printed.contains("123"));
    }

    #[test]
    fn net_banking_needs_bank() {
        assert!(PaymentDetails::NetBanking { bank: " ".into() }.validate().is_err());
        assert!(PaymentDetails::NetBanking { bank: "SBI".into() }.validate().is_ok());
    }

    #[test]
    fn transaction_ids_are_unique_and_shaped() {
        let a = transaction_id();
        let b = transaction_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 19);
        assert!(a.starts_with("TXN"));
        assert!(a[3..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }
}
