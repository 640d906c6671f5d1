//! Booking domain module.
//!
//! Owns the booking lifecycle: the `(status, payment_status)` state machine,
//! the aggregate that applies transitions, and the error taxonomy the
//! synchronous creation path surfaces to callers.

mod aggregate;
mod errors;
mod state;

pub use aggregate::{Booking, BookingDraft, BookingSubject, PaymentFailureOutcome};
pub use errors::BookingError;
pub use state::{BookingState, BookingStatus, PaymentStatus};
