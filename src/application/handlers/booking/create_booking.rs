//! CreateBookingHandler - Command handler for creating bookings.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::domain::booking::{Booking, BookingDraft, BookingError, BookingSubject};
use crate::domain::foundation::UserId;
use crate::domain::payment::{CurrencyCode, PaymentVerifier};
use crate::ports::{BookingRepository, PaymentProcessorClient, RepositoryError};

/// Command to create a booking, optionally claiming a completed payment.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub user_id: UserId,
    pub subject: BookingSubject,
    pub total_price: Decimal,
    /// ISO 4217 code; the configured default applies when absent.
    pub currency: Option<String>,
    /// Payment reference to verify and bind. Absent means pay-later.
    pub payment_reference: Option<String>,
}

/// Handler for creating bookings.
///
/// With a payment reference the payment is verified synchronously and the
/// booking is inserted already confirmed, in one commit. Without one the
/// booking is created `(pending, unpaid)`.
pub struct CreateBookingHandler {
    repository: Arc<dyn BookingRepository>,
    verifier: PaymentVerifier,
    default_currency: CurrencyCode,
}

impl CreateBookingHandler {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        processor: Arc<dyn PaymentProcessorClient>,
        default_currency: CurrencyCode,
    ) -> Self {
        let verifier = PaymentVerifier::new(repository.clone(), processor);
        Self {
            repository,
            verifier,
            default_currency,
        }
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<Booking, BookingError> {
        let currency = match &cmd.currency {
            Some(code) => {
                CurrencyCode::parse(code).map_err(|_| BookingError::InvalidCurrency(code.clone()))?
            }
            None => self.default_currency.clone(),
        };

        let draft = BookingDraft::new(cmd.user_id.clone(), cmd.subject, cmd.total_price, currency)?;

        let booking = match cmd.payment_reference.as_deref().map(str::trim) {
            Some("") => {
                return Err(BookingError::Validation {
                    field: "payment_reference",
                    message: "must not be empty when provided".to_string(),
                });
            }
            Some(reference) => {
                let payment = self.verifier.verify(&draft, reference, &cmd.user_id).await?;
                Booking::confirmed(draft, payment, Utc::now())
            }
            None => Booking::pending(draft, Utc::now()),
        };

        self.repository.insert(&booking).await.map_err(|e| match e {
            RepositoryError::DuplicateReference => BookingError::DuplicatePaymentReference(
                booking.payment_reference.clone().unwrap_or_default(),
            ),
            other => BookingError::Storage(other.to_string()),
        })?;

        info!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            status = booking.status.as_str(),
            "booking created"
        );
        Ok(booking)
    }
}
