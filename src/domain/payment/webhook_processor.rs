//! Asynchronous webhook event processing.
//!
//! Handles signed failure notifications pushed by the processor. The
//! endpoint acknowledges everything it can safely acknowledge: unknown
//! event types, events for bookings this system never created, and
//! re-deliveries all ack with 2xx so the processor stops retrying. Only
//! authentication problems and our own storage failures surface as errors.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::booking::PaymentFailureOutcome;
use crate::domain::foundation::BookingId;
use crate::ports::{BookingRepository, PaymentProcessorClient, ProcessorError};

use super::event::PspEventKind;

/// How a delivery was handled. Every variant acks with 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAck {
    /// The failure transition was applied and persisted.
    Applied { booking_id: BookingId },
    /// Re-delivery; the booking was already in the failed state.
    AlreadyFailed { booking_id: BookingId },
    /// The booking was cancelled first; its terminal state stands.
    SupersededByCancellation { booking_id: BookingId },
    /// No booking holds the referenced payment. Acked so the processor
    /// does not retry events for payments made outside this system.
    NoMatchingBooking,
    /// An event type this core does not act on.
    Ignored { event_type: String },
}

/// Errors the webhook endpoint reports back to the processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// No signing secret is configured; deliveries cannot be authenticated.
    #[error("webhook signing secret not configured")]
    ProcessorMisconfigured,

    /// The delivery carried no signature header.
    #[error("missing webhook signature header")]
    SignatureMissing,

    /// The signature did not verify against the configured secret.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// The authenticated payload could not be interpreted.
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// Persisting the transition failed; the processor should retry.
    #[error("storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    pub fn status_code(&self) -> u16 {
        match self {
            WebhookError::ProcessorMisconfigured => 500,
            WebhookError::SignatureMissing => 400,
            WebhookError::InvalidSignature => 400,
            WebhookError::InvalidPayload(_) => 400,
            WebhookError::Storage(_) => 500,
        }
    }
}

/// Processes signed webhook deliveries from the payment processor.
pub struct WebhookProcessor {
    repository: Arc<dyn BookingRepository>,
    processor: Arc<dyn PaymentProcessorClient>,
    /// Absent when the deployment never configured webhooks; deliveries
    /// are then rejected rather than accepted unauthenticated.
    signing_secret: Option<SecretString>,
}

impl WebhookProcessor {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        processor: Arc<dyn PaymentProcessorClient>,
        signing_secret: Option<SecretString>,
    ) -> Self {
        Self {
            repository,
            processor,
            signing_secret,
        }
    }

    /// Authenticates and applies one delivery.
    ///
    /// Signature verification happens before the payload is interpreted
    /// at all. An unverified body is never parsed for content.
    pub async fn handle(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookAck, WebhookError> {
        let secret = self
            .signing_secret
            .as_ref()
            .ok_or(WebhookError::ProcessorMisconfigured)?;
        let signature_header = signature_header.ok_or(WebhookError::SignatureMissing)?;

        let event = self
            .processor
            .verify_signed_event(payload, signature_header, secret.expose_secret())
            .map_err(|e| match e {
                ProcessorError::InvalidSignature => WebhookError::InvalidSignature,
                ProcessorError::MalformedPayload(msg) => WebhookError::InvalidPayload(msg),
                other => WebhookError::InvalidPayload(other.to_string()),
            })?;

        match event.kind() {
            PspEventKind::PaymentFailed => {}
            PspEventKind::Other(event_type) => {
                info!(event_id = %event.id, %event_type, "ignoring webhook event type");
                return Ok(WebhookAck::Ignored { event_type });
            }
        }

        let reference = event.payment_reference().ok_or_else(|| {
            WebhookError::InvalidPayload("failure event without a payment id".to_string())
        })?;

        let booking = self
            .repository
            .find_by_payment_reference(reference)
            .await
            .map_err(|e| WebhookError::Storage(e.to_string()))?;

        let Some(mut booking) = booking else {
            info!(reference, "failure event matches no booking");
            return Ok(WebhookAck::NoMatchingBooking);
        };

        let booking_id = booking.id;
        match booking.apply_payment_failure() {
            PaymentFailureOutcome::Applied => {
                self.repository
                    .update_payment_status(&booking_id, booking.status, booking.payment_status)
                    .await
                    .map_err(|e| WebhookError::Storage(e.to_string()))?;
                info!(%booking_id, reference, "applied payment failure");
                Ok(WebhookAck::Applied { booking_id })
            }
            PaymentFailureOutcome::AlreadyFailed => {
                info!(%booking_id, reference, "failure already applied");
                Ok(WebhookAck::AlreadyFailed { booking_id })
            }
            PaymentFailureOutcome::SupersededByCancellation => {
                warn!(%booking_id, reference, "failure event for cancelled booking");
                Ok(WebhookAck::SupersededByCancellation { booking_id })
            }
        }
    }
}
