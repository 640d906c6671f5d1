//! Payment processor configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment processor configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: SecretString,

    /// Stripe webhook signing secret
    ///
    /// Optional at load time: a deployment without webhooks configured
    /// still starts, and the webhook endpoint answers 500 until the
    /// secret is provisioned.
    pub stripe_webhook_secret: Option<SecretString>,

    /// Timeout for calls to the Stripe API, in seconds
    #[serde(default = "default_api_timeout")]
    pub api_timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Get the API timeout as Duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if !self.stripe_secret_key.expose_secret().starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(secret) = &self.stripe_webhook_secret {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        Ok(())
    }
}

fn default_api_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str, webhook: Option<&str>) -> PaymentConfig {
        PaymentConfig {
            stripe_secret_key: SecretString::new(key.to_string()),
            stripe_webhook_secret: webhook.map(|s| SecretString::new(s.to_string())),
            api_timeout_secs: default_api_timeout(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        assert!(config("sk_test_xxx", None).is_test_mode());
        assert!(!config("sk_live_xxx", None).is_test_mode());
    }

    #[test]
    fn test_validation_missing_api_key() {
        assert!(config("", None).validate().is_err());
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        assert!(config("pk_test_xxx", None).validate().is_err());
    }

    #[test]
    fn test_validation_webhook_secret_optional() {
        assert!(config("sk_test_xxx", None).validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_webhook_secret_prefix() {
        assert!(config("sk_test_xxx", Some("secret_xxx")).validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config("sk_test_abcd", Some("whsec_xyz")).validate().is_ok());
    }
}
