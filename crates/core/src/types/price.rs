//! Type-safe money representation using decimal arithmetic.
//!
//! Shopify sends amounts as decimal strings (`"19.99"`). Parsing into
//! [`Decimal`] keeps the exact scale that was received, so `"20.0"` displays
//! as `20.0` and never picks up float rounding.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a [`Money`] value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount {0:?}: {1}")]
    InvalidAmount(String, String),
    #[error("Missing currency code")]
    MissingCurrency,
}

/// A monetary amount with its ISO 4217 currency code.
///
/// The currency code is kept as the string the API returned; this crate
/// never converts between currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a new money value.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Parse an amount string and currency code as returned by the Storefront API.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` if the amount is not a decimal number or the
    /// currency code is blank.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, MoneyError> {
        let currency_code = currency_code.trim();
        if currency_code.is_empty() {
            return Err(MoneyError::MissingCurrency);
        }

        let amount = Decimal::from_str(amount.trim())
            .map_err(|e| MoneyError::InvalidAmount(amount.to_string(), e.to_string()))?;

        Ok(Self::new(amount, currency_code))
    }
}

/// Formats as `"{amount} {currency_code}"`, e.g. `19.99 USD`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code)
    }
}
