//! Synchronous payment verification.
//!
//! Before a booking is confirmed, the payment reference the client claims
//! is checked against the processor's own record. The checks run in a
//! fixed order and short-circuit on the first failure: uniqueness,
//! retrieval, ownership, status, amount. Only a payment that clears all
//! five yields a `VerifiedPayment`.

use std::sync::Arc;
use tracing::warn;

use crate::domain::booking::{BookingDraft, BookingError};
use crate::domain::foundation::UserId;
use crate::ports::{
    BookingRepository, PaymentProcessorClient, PaymentRecordStatus, ProcessorError,
};

use super::currency::{to_minor_units, CurrencyCode};

/// Metadata key the processor record carries the owning user id under.
const OWNER_METADATA_KEY: &str = "user_id";

/// A payment that passed all verification checks.
///
/// Carries the facts the booking needs from the processor's record: the
/// reference to bind, the settled currency, and the status string for the
/// audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    pub reference: String,
    pub currency: CurrencyCode,
    pub status: String,
}

/// Verifies claimed payments against the processor before confirmation.
pub struct PaymentVerifier {
    repository: Arc<dyn BookingRepository>,
    processor: Arc<dyn PaymentProcessorClient>,
}

impl PaymentVerifier {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        processor: Arc<dyn PaymentProcessorClient>,
    ) -> Self {
        Self {
            repository,
            processor,
        }
    }

    /// Runs the full verification sequence for a claimed payment.
    ///
    /// The duplicate pre-check here is advisory: the storage uniqueness
    /// constraint on insert is what actually closes the race between two
    /// concurrent claims of the same reference.
    pub async fn verify(
        &self,
        draft: &BookingDraft,
        reference: &str,
        requesting_user: &UserId,
    ) -> Result<VerifiedPayment, BookingError> {
        if self
            .repository
            .find_by_payment_reference(reference)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?
            .is_some()
        {
            return Err(BookingError::DuplicatePaymentReference(
                reference.to_string(),
            ));
        }

        let record = self.processor.retrieve(reference).await.map_err(|e| {
            warn!(reference, error = %e, "payment retrieval failed");
            match e {
                // A reference the processor has never issued is a bad
                // request field, not an outage: the lookup itself worked,
                // so "try again" would be the wrong answer.
                ProcessorError::NotFound(_) => BookingError::Validation {
                    field: "payment_reference",
                    message: "unknown payment reference".to_string(),
                },
                other => BookingError::ProcessorUnavailable(other.to_string()),
            }
        })?;

        let owner = record.metadata.get(OWNER_METADATA_KEY);
        if owner.map(String::as_str) != Some(requesting_user.as_str()) {
            warn!(reference, "payment ownership mismatch");
            return Err(BookingError::PaymentOwnershipMismatch);
        }

        if record.status != PaymentRecordStatus::Succeeded {
            return Err(BookingError::PaymentNotCompleted(
                record.status.as_str().to_string(),
            ));
        }

        let currency = CurrencyCode::parse(&record.currency)
            .map_err(|_| BookingError::InvalidCurrency(record.currency.clone()))?;
        let expected = to_minor_units(draft.total_price, currency.as_str())?;
        let actual = record.settled_amount();
        if expected != actual {
            return Err(BookingError::AmountMismatch { expected, actual });
        }

        Ok(VerifiedPayment {
            reference: record.reference,
            currency,
            status: record.status.as_str().to_string(),
        })
    }
}
