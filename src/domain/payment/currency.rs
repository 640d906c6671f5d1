//! Currency codes and minor-unit conversion.
//!
//! The processor stores amounts as integers in the currency's smallest
//! unit. The verifier compares those integers for exact equality, so the
//! conversion here must round exactly the way the processor does:
//! half away from zero, with a multiplier of 1 for zero-decimal currencies
//! and 100 for everything else.

use once_cell::sync::Lazy;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Currencies whose smallest unit is the whole unit (no cents).
///
/// Single source of truth for minor-unit math; matches the processor's
/// zero-decimal list.
pub const ZERO_DECIMAL_CURRENCIES: [&str; 16] = [
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

static ZERO_DECIMAL_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ZERO_DECIMAL_CURRENCIES.iter().copied().collect());

/// Errors from currency parsing and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// The code is not a 3-letter ISO 4217 code.
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    /// The amount does not fit in an i64 once converted to minor units.
    #[error("amount not representable in minor units: {0}")]
    AmountNotRepresentable(Decimal),
}

/// Validated, uppercased ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a currency code, case-insensitively.
    pub fn parse(code: &str) -> Result<Self, CurrencyError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this currency has no fractional unit.
    pub fn is_zero_decimal(&self) -> bool {
        ZERO_DECIMAL_SET.contains(self.0.as_str())
    }

    /// Minor units per major unit.
    pub fn minor_unit_multiplier(&self) -> i64 {
        if self.is_zero_decimal() {
            1
        } else {
            100
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Converts a decimal amount to the processor's integer minor units.
///
/// Pure and deterministic. Fails only on a malformed currency code or an
/// amount too large to represent.
pub fn to_minor_units(amount: Decimal, currency: &str) -> Result<i64, CurrencyError> {
    let code = CurrencyCode::parse(currency)?;
    let scaled = amount * Decimal::from(code.minor_unit_multiplier());
    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CurrencyError::AmountNotRepresentable(amount))
}
