//! Stripe HTTP client.
//!
//! Implements `PaymentProcessorClient` against the Stripe REST API. Every
//! request carries the configured timeout, so a slow Stripe outage turns
//! into a bounded `Transport` error instead of a hung booking request.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::warn;

use crate::domain::payment::{PspEvent, SignatureError, WebhookSignatureVerifier};
use crate::ports::{PaymentProcessorClient, PaymentRecord, ProcessorError};

use super::types::{PaymentIntent, StripeErrorResponse};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API client.
pub struct StripeClient {
    http_client: reqwest::Client,
    secret_key: SecretString,
    api_base_url: String,
}

impl StripeClient {
    /// Creates a client with the given key and per-request timeout.
    pub fn new(secret_key: SecretString, timeout: Duration) -> Result<Self, ProcessorError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProcessorError::Transport(e.to_string()))?;
        Ok(Self {
            http_client,
            secret_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        })
    }

    /// Points the client at a different base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    fn map_transport_error(e: reqwest::Error) -> ProcessorError {
        if e.is_timeout() {
            ProcessorError::Transport("request timed out".to_string())
        } else {
            ProcessorError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl PaymentProcessorClient for StripeClient {
    async fn retrieve(&self, reference: &str) -> Result<PaymentRecord, ProcessorError> {
        let url = format!("{}/v1/payment_intents/{}", self.api_base_url, reference);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ProcessorError::NotFound(reference.to_string())),
            status if status.is_success() => {
                let intent: PaymentIntent = response
                    .json()
                    .await
                    .map_err(|e| ProcessorError::Api(format!("unparseable response: {}", e)))?;
                Ok(intent.into())
            }
            status => {
                let message = response
                    .json::<StripeErrorResponse>()
                    .await
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| "no error detail".to_string());
                warn!(%status, message, "Stripe API request failed");
                Err(ProcessorError::Api(format!("{}: {}", status, message)))
            }
        }
    }

    fn verify_signed_event(
        &self,
        payload: &[u8],
        signature_header: &str,
        secret: &str,
    ) -> Result<PspEvent, ProcessorError> {
        let verifier = WebhookSignatureVerifier::new(secret);
        verifier
            .verify(payload, signature_header)
            .map_err(|e| match e {
                // A header we cannot parse is indistinguishable from a forgery.
                SignatureError::MalformedHeader(_) | SignatureError::Invalid => {
                    ProcessorError::InvalidSignature
                }
            })?;

        serde_json::from_slice(payload).map_err(|e| ProcessorError::MalformedPayload(e.to_string()))
    }
}
