use super::{round_money, LedgerError, RecordType};

/// Price per litre paid to milkmen and charged to buyers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DairyRates {
    milkman_rate: f64,
    buyer_rate: f64,
}

impl DairyRates {
    /// Rates are stored to two decimals, so they are rounded before the
    /// ordering check; what is validated is what gets written.
    pub fn new(milkman_rate: f64, buyer_rate: f64) -> Result<Self, LedgerError> {
        let milkman_rate = positive_cents(milkman_rate).ok_or(LedgerError::NonPositiveRate)?;
        let buyer_rate = positive_cents(buyer_rate).ok_or(LedgerError::NonPositiveRate)?;
        if buyer_rate <= milkman_rate {
            return Err(LedgerError::RateOrdering { milkman: milkman_rate, buyer: buyer_rate });
        }
        Ok(Self { milkman_rate, buyer_rate })
    }

    pub fn milkman_rate(&self) -> f64 {
        self.milkman_rate
    }

    pub fn buyer_rate(&self) -> f64 {
        self.buyer_rate
    }

    pub fn rate_for(&self, record_type: RecordType) -> f64 {
        match record_type {
            RecordType::Purchase => self.buyer_rate,
            RecordType::Supply => self.milkman_rate,
        }
    }
}

/// `value` rounded to two decimals, if it is still greater than zero.
pub fn positive_cents(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = round_money(value);
    (rounded > 0.0).then_some(rounded)
}

/// Quantity, rate and amount frozen together at the moment a record or sale
/// is written. Later rate or price changes never touch an existing entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedEntry {
    pub quantity: f64,
    pub rate: f64,
    pub amount: f64,
}

impl PricedEntry {
    /// Quantity and rate are rounded to the stored precision first, so the
    /// amount always equals the stored quantity times the stored rate.
    pub fn price(quantity: f64, rate: f64) -> Result<Self, LedgerError> {
        let quantity = positive_cents(quantity).ok_or(LedgerError::InvalidQuantity)?;
        let rate = positive_cents(rate).ok_or(LedgerError::NonPositiveRate)?;
        Ok(Self { quantity, rate, amount: round_money(quantity * rate) })
    }

    pub fn for_record(quantity: f64, rates: &DairyRates, record_type: RecordType) -> Result<Self, LedgerError> {
        Self::price(quantity, rates.rate_for(record_type))
    }
}
