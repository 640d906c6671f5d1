//! Booking configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Booking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Currency assumed when a booking request does not name one
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl BookingConfig {
    /// Validate booking configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let code = self.default_currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidDefaultCurrency);
        }
        Ok(())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}
