//! Booking domain errors.
//!
//! One taxonomy covers the whole booking/payment reconciliation flow.
//! Each variant maps to an HTTP status, and `user_message` keeps
//! processor internals out of client responses.

use thiserror::Error;

use crate::domain::foundation::{IllegalTransition, ValidationError};
use crate::domain::payment::CurrencyError;

/// Errors from booking operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The currency is not a known ISO 4217 code.
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    /// The payment reference is already bound to another booking.
    #[error("payment reference already used: {0}")]
    DuplicatePaymentReference(String),

    /// The payment processor could not be reached or answered unusably.
    #[error("payment processor unavailable: {0}")]
    ProcessorUnavailable(String),

    /// The payment belongs to a different user than the requester.
    #[error("payment does not belong to the requesting user")]
    PaymentOwnershipMismatch,

    /// The payment is not in a terminal success state.
    #[error("payment not completed, status is {0}")]
    PaymentNotCompleted(String),

    /// The captured amount does not equal the booking total.
    #[error("payment amount mismatch: expected {expected} minor units, got {actual}")]
    AmountMismatch { expected: i64, actual: i64 },

    /// A state transition the lifecycle does not permit.
    #[error(transparent)]
    IllegalStateTransition(#[from] IllegalTransition),

    /// A request field failed validation.
    #[error("validation failed on {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The requested booking does not exist.
    #[error("booking not found")]
    NotFound,

    /// Persistence failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl BookingError {
    /// HTTP status the adapter layer maps this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            BookingError::InvalidCurrency(_) => 400,
            BookingError::DuplicatePaymentReference(_) => 409,
            // Surfaced as a client-retryable 4xx; the technical detail
            // stays in the logs.
            BookingError::ProcessorUnavailable(_) => 422,
            BookingError::PaymentOwnershipMismatch => 403,
            BookingError::PaymentNotCompleted(_) => 422,
            BookingError::AmountMismatch { .. } => 422,
            BookingError::IllegalStateTransition(_) => 409,
            BookingError::Validation { .. } => 400,
            BookingError::NotFound => 404,
            BookingError::Storage(_) => 500,
        }
    }

    /// Message safe to return to the client.
    ///
    /// Processor and storage details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::InvalidCurrency(code) => {
                format!("'{}' is not a supported currency", code)
            }
            BookingError::DuplicatePaymentReference(_) => {
                "This payment has already been used for a booking".to_string()
            }
            BookingError::ProcessorUnavailable(_) => {
                "Unable to verify payment, please try again".to_string()
            }
            BookingError::PaymentOwnershipMismatch => {
                "This payment belongs to a different account".to_string()
            }
            BookingError::PaymentNotCompleted(status) => {
                format!("Payment has not completed (status: {})", status)
            }
            BookingError::AmountMismatch { .. } => {
                "Payment amount does not match the booking total".to_string()
            }
            BookingError::IllegalStateTransition(_) => {
                "The booking is not in a state that allows this action".to_string()
            }
            BookingError::Validation { field, message } => {
                format!("{}: {}", field, message)
            }
            BookingError::NotFound => "Booking not found".to_string(),
            BookingError::Storage(_) => "Something went wrong, please try again".to_string(),
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<CurrencyError> for BookingError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::InvalidCurrency(code) => BookingError::InvalidCurrency(code),
            // Amounts beyond minor-unit range read as malformed input.
            CurrencyError::AmountNotRepresentable(amount) => BookingError::Validation {
                field: "total_price",
                message: format!("amount {} cannot be represented in minor units", amount),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(BookingError::InvalidCurrency("XXX".into()).status_code(), 400);
        assert_eq!(
            BookingError::DuplicatePaymentReference("pi_1".into()).status_code(),
            409
        );
        assert_eq!(
            BookingError::ProcessorUnavailable("timeout".into()).status_code(),
            422
        );
        assert_eq!(BookingError::PaymentOwnershipMismatch.status_code(), 403);
        assert_eq!(
            BookingError::PaymentNotCompleted("processing".into()).status_code(),
            422
        );
        assert_eq!(
            BookingError::AmountMismatch {
                expected: 1999,
                actual: 2000
            }
            .status_code(),
            422
        );
        assert_eq!(BookingError::NotFound.status_code(), 404);
        assert_eq!(BookingError::Storage("down".into()).status_code(), 500);
    }

    #[test]
    fn verification_failures_are_client_errors() {
        // Everything the verifier can raise answers 4xx; only storage and
        // misconfiguration are server errors.
        let verifier_errors = [
            BookingError::InvalidCurrency("XXX".into()),
            BookingError::DuplicatePaymentReference("pi_1".into()),
            BookingError::ProcessorUnavailable("timeout".into()),
            BookingError::PaymentOwnershipMismatch,
            BookingError::PaymentNotCompleted("processing".into()),
            BookingError::AmountMismatch {
                expected: 1999,
                actual: 2000,
            },
            BookingError::Validation {
                field: "payment_reference",
                message: "unknown".into(),
            },
        ];
        for err in verifier_errors {
            let status = err.status_code();
            assert!((400..500).contains(&status), "{:?} answered {}", err, status);
        }
    }

    #[test]
    fn illegal_transition_is_conflict() {
        let err = BookingError::from(IllegalTransition {
            from: "cancelled/unpaid".to_string(),
            to: "confirmed/succeeded".to_string(),
        });
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn user_messages_hide_internals() {
        let err = BookingError::Storage("connection refused at 10.0.0.3:5432".into());
        assert!(!err.user_message().contains("10.0.0.3"));

        let err = BookingError::ProcessorUnavailable("api key leaked in trace".into());
        assert!(!err.user_message().contains("api key"));
    }

    #[test]
    fn currency_error_converts() {
        let err: BookingError = CurrencyError::InvalidCurrency("ZZZ".to_string()).into();
        assert_eq!(err, BookingError::InvalidCurrency("ZZZ".to_string()));
    }
}
