//! Booking aggregate.
//!
//! The only entity this core mutates. All state changes go through the
//! `BookingState` machine; constructors produce fully-formed rows so the
//! storage adapter can commit them in a single statement.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{BookingId, IllegalTransition, StateMachine, UserId, ValidationError};
use crate::domain::payment::{CurrencyCode, VerifiedPayment};

use super::state::{BookingState, BookingStatus, PaymentStatus};

/// What the booking reserves: exactly one of a hotel room or a flight seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingSubject {
    Hotel {
        hotel_id: Uuid,
        room_id: Uuid,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    Flight {
        flight_id: Uuid,
    },
}

/// A booking request that passed field validation but has not been persisted.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub user_id: UserId,
    pub subject: BookingSubject,
    pub total_price: Decimal,
    pub currency: CurrencyCode,
}

impl BookingDraft {
    /// Validates the draft fields.
    ///
    /// The subject shape (exactly one of hotel or flight) is enforced by the
    /// `BookingSubject` type itself; this checks the value-level rules.
    pub fn new(
        user_id: UserId,
        subject: BookingSubject,
        total_price: Decimal,
        currency: CurrencyCode,
    ) -> Result<Self, ValidationError> {
        if total_price <= Decimal::ZERO {
            return Err(ValidationError::new("total_price", "must be positive"));
        }
        if let BookingSubject::Hotel {
            check_in,
            check_out,
            ..
        } = &subject
        {
            if check_out <= check_in {
                return Err(ValidationError::new(
                    "check_out",
                    "must be after check_in",
                ));
            }
        }
        Ok(Self {
            user_id,
            subject,
            total_price,
            currency,
        })
    }
}

/// Outcome of applying a payment-failure notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFailureOutcome {
    /// The failure transition was applied.
    Applied,
    /// The booking was already in the failed state; nothing changed.
    AlreadyFailed,
    /// The booking was cancelled before the notification arrived; terminal
    /// state is preserved and the event is a no-op.
    SupersededByCancellation,
}

/// The booking aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub subject: BookingSubject,
    pub total_price: Decimal,
    pub currency: CurrencyCode,
    /// Globally unique when present; set iff a verification succeeded, and
    /// never cleared or reassigned afterwards.
    pub payment_reference: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a pay-later booking: `(pending, unpaid)`, no reference.
    pub fn pending(draft: BookingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            user_id: draft.user_id,
            subject: draft.subject,
            total_price: draft.total_price,
            currency: draft.currency,
            payment_reference: None,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            created_at: now,
        }
    }

    /// Creates a booking confirmed by a verified payment.
    ///
    /// The insert of this row is the `(pending, unpaid) -> (confirmed,
    /// succeeded)` transition: the booking is never durably visible with a
    /// reference but without confirmation. The settled currency comes from
    /// the payment record, not the client-submitted draft.
    pub fn confirmed(draft: BookingDraft, payment: VerifiedPayment, now: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            user_id: draft.user_id,
            subject: draft.subject,
            total_price: draft.total_price,
            currency: payment.currency,
            payment_reference: Some(payment.reference),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Succeeded,
            created_at: now,
        }
    }

    /// Current composite state.
    pub fn state(&self) -> BookingState {
        BookingState::new(self.status, self.payment_status)
    }

    fn set_state(&mut self, state: BookingState) {
        self.status = state.status;
        self.payment_status = state.payment_status;
    }

    /// Applies a payment-failure notification.
    ///
    /// Total over all states: a cancelled booking reports the event as
    /// superseded instead of failing, and re-delivery of the same failure
    /// is reported as already applied. Status is forced back to pending so
    /// the user can retry payment.
    pub fn apply_payment_failure(&mut self) -> PaymentFailureOutcome {
        let target = BookingState::pending_failed();
        if self.state() == target {
            return PaymentFailureOutcome::AlreadyFailed;
        }
        match self.state().transition_to(target) {
            Ok(next) => {
                self.set_state(next);
                PaymentFailureOutcome::Applied
            }
            // Only the terminal cancelled state rejects the failure target.
            Err(_) => PaymentFailureOutcome::SupersededByCancellation,
        }
    }

    /// User-initiated cancellation. Terminal; cancelling twice is illegal.
    pub fn cancel(&mut self) -> Result<(), IllegalTransition> {
        let target = BookingState::new(BookingStatus::Cancelled, self.payment_status);
        let next = self.state().transition_to(target)?;
        self.set_state(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn hotel_subject() -> BookingSubject {
        BookingSubject::Hotel {
            hotel_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            check_in: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
        }
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::parse("USD").unwrap()
    }

    fn draft() -> BookingDraft {
        BookingDraft::new(test_user(), hotel_subject(), dec!(100.00), usd()).unwrap()
    }

    fn verified(reference: &str, currency: &str) -> VerifiedPayment {
        VerifiedPayment {
            reference: reference.to_string(),
            currency: CurrencyCode::parse(currency).unwrap(),
            status: "succeeded".to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Draft Validation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn draft_rejects_zero_price() {
        let result = BookingDraft::new(test_user(), hotel_subject(), Decimal::ZERO, usd());
        assert!(result.is_err());
    }

    #[test]
    fn draft_rejects_negative_price() {
        let result = BookingDraft::new(test_user(), hotel_subject(), dec!(-5), usd());
        assert!(result.is_err());
    }

    #[test]
    fn draft_rejects_inverted_date_range() {
        let subject = BookingSubject::Hotel {
            hotel_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            check_in: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        };
        let result = BookingDraft::new(test_user(), subject, dec!(100), usd());
        assert!(result.is_err());
    }

    #[test]
    fn draft_accepts_flight_subject() {
        let subject = BookingSubject::Flight {
            flight_id: Uuid::new_v4(),
        };
        assert!(BookingDraft::new(test_user(), subject, dec!(250.50), usd()).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Constructors
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn pending_booking_starts_unpaid_without_reference() {
        let booking = Booking::pending(draft(), Utc::now());
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Unpaid);
        assert!(booking.payment_reference.is_none());
    }

    #[test]
    fn confirmed_booking_carries_reference_and_settled_state() {
        let booking = Booking::confirmed(draft(), verified("pi_123", "USD"), Utc::now());
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Succeeded);
        assert_eq!(booking.payment_reference.as_deref(), Some("pi_123"));
    }

    #[test]
    fn confirmed_booking_takes_currency_from_payment() {
        // Client submitted USD, the payment settled in EUR.
        let booking = Booking::confirmed(draft(), verified("pi_123", "EUR"), Utc::now());
        assert_eq!(booking.currency.as_str(), "EUR");
    }

    // ══════════════════════════════════════════════════════════════
    // Payment Failure
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn failure_moves_confirmed_booking_back_to_pending() {
        let mut booking = Booking::confirmed(draft(), verified("pi_123", "USD"), Utc::now());
        let outcome = booking.apply_payment_failure();
        assert_eq!(outcome, PaymentFailureOutcome::Applied);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Failed);
        // Reference stays attached even after a failure.
        assert_eq!(booking.payment_reference.as_deref(), Some("pi_123"));
    }

    #[test]
    fn failure_is_idempotent() {
        let mut booking = Booking::confirmed(draft(), verified("pi_123", "USD"), Utc::now());
        booking.apply_payment_failure();
        let state_after_first = booking.state();

        let outcome = booking.apply_payment_failure();
        assert_eq!(outcome, PaymentFailureOutcome::AlreadyFailed);
        assert_eq!(booking.state(), state_after_first);
    }

    #[test]
    fn failure_never_reopens_cancelled_booking() {
        let mut booking = Booking::confirmed(draft(), verified("pi_123", "USD"), Utc::now());
        booking.cancel().unwrap();

        let outcome = booking.apply_payment_failure();
        assert_eq!(outcome, PaymentFailureOutcome::SupersededByCancellation);
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    // ══════════════════════════════════════════════════════════════
    // Cancellation
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn cancel_preserves_payment_status() {
        let mut booking = Booking::confirmed(draft(), verified("pi_123", "USD"), Utc::now());
        booking.cancel().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.payment_status, PaymentStatus::Succeeded);
    }

    #[test]
    fn cancel_twice_is_illegal() {
        let mut booking = Booking::pending(draft(), Utc::now());
        booking.cancel().unwrap();
        assert!(booking.cancel().is_err());
    }
}
