//! Payment processor client port.
//!
//! Contract for the external PSP integration: retrieving a payment by
//! reference and authenticating signed webhook deliveries. The processor
//! itself is out of scope; this port is the full extent of what the core
//! knows about it.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::payment::PspEvent;

/// Status of a payment as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRecordStatus {
    /// Terminal success; the only status the verifier accepts.
    Succeeded,
    /// Still in flight at the processor.
    Processing,
    /// Waiting for the customer to provide a (new) payment method.
    RequiresPaymentMethod,
    /// Abandoned or cancelled at the processor.
    Canceled,
    /// Any status this core does not model.
    Other(String),
}

impl PaymentRecordStatus {
    /// Parses the processor's status string.
    pub fn from_str(status: &str) -> Self {
        match status {
            "succeeded" => PaymentRecordStatus::Succeeded,
            "processing" => PaymentRecordStatus::Processing,
            "requires_payment_method" => PaymentRecordStatus::RequiresPaymentMethod,
            "canceled" => PaymentRecordStatus::Canceled,
            other => PaymentRecordStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentRecordStatus::Succeeded => "succeeded",
            PaymentRecordStatus::Processing => "processing",
            PaymentRecordStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentRecordStatus::Canceled => "canceled",
            PaymentRecordStatus::Other(s) => s,
        }
    }
}

/// Read-only view of a payment held by the processor.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    /// Processor-assigned payment reference.
    pub reference: String,

    /// Current status at the processor.
    pub status: PaymentRecordStatus,

    /// Nominal amount in minor units.
    pub amount: i64,

    /// Amount actually captured, when the processor distinguishes
    /// authorized from captured. Preferred for the amount check.
    pub amount_received: Option<i64>,

    /// Settled currency code as reported by the processor.
    pub currency: String,

    /// Opaque metadata; expected to carry the requesting user's id under
    /// the `user_id` key.
    pub metadata: HashMap<String, String>,
}

impl PaymentRecord {
    /// The amount the verifier compares against: captured if reported,
    /// nominal otherwise.
    pub fn settled_amount(&self) -> i64 {
        self.amount_received.unwrap_or(self.amount)
    }
}

/// Errors from the processor client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessorError {
    /// Network failure or timeout talking to the processor.
    #[error("processor transport failure: {0}")]
    Transport(String),

    /// The processor does not know the reference.
    #[error("payment not found: {0}")]
    NotFound(String),

    /// The processor rejected the request or returned an unusable body.
    #[error("processor API error: {0}")]
    Api(String),

    /// A webhook delivery failed signature verification.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// A webhook payload could not be parsed.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),
}

/// Client port for the external payment processor.
#[async_trait]
pub trait PaymentProcessorClient: Send + Sync {
    /// Retrieve a payment record by reference.
    ///
    /// A single bounded call: implementations must apply a request timeout
    /// and surface it as `Transport` rather than hang the request. Retries
    /// are the caller's concern, not this port's.
    async fn retrieve(&self, reference: &str) -> Result<PaymentRecord, ProcessorError>;

    /// Verify a signed webhook delivery and parse the event.
    ///
    /// Fails with `InvalidSignature` before looking at the payload content,
    /// and with `MalformedPayload` when the authenticated body does not
    /// parse.
    fn verify_signed_event(
        &self,
        payload: &[u8],
        signature_header: &str,
        secret: &str,
    ) -> Result<PspEvent, ProcessorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_processor_client_is_object_safe() {
        fn _accepts_dyn(_client: &dyn PaymentProcessorClient) {}
    }

    #[test]
    fn status_parses_known_values() {
        assert_eq!(
            PaymentRecordStatus::from_str("succeeded"),
            PaymentRecordStatus::Succeeded
        );
        assert_eq!(
            PaymentRecordStatus::from_str("processing"),
            PaymentRecordStatus::Processing
        );
        assert_eq!(
            PaymentRecordStatus::from_str("requires_payment_method"),
            PaymentRecordStatus::RequiresPaymentMethod
        );
    }

    #[test]
    fn status_preserves_unknown_values() {
        let status = PaymentRecordStatus::from_str("requires_capture");
        assert_eq!(status, PaymentRecordStatus::Other("requires_capture".to_string()));
        assert_eq!(status.as_str(), "requires_capture");
    }

    #[test]
    fn settled_amount_prefers_captured() {
        let record = PaymentRecord {
            reference: "pi_1".to_string(),
            status: PaymentRecordStatus::Succeeded,
            amount: 2000,
            amount_received: Some(1999),
            currency: "usd".to_string(),
            metadata: HashMap::new(),
        };
        assert_eq!(record.settled_amount(), 1999);
    }

    #[test]
    fn settled_amount_falls_back_to_nominal() {
        let record = PaymentRecord {
            reference: "pi_1".to_string(),
            status: PaymentRecordStatus::Succeeded,
            amount: 2000,
            amount_received: None,
            currency: "usd".to_string(),
            metadata: HashMap::new(),
        };
        assert_eq!(record.settled_amount(), 2000);
    }
}
