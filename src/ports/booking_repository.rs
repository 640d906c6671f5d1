//! Booking repository port.
//!
//! Persistence contract for the `Booking` aggregate. The uniqueness of
//! `payment_reference` is enforced here, at the storage layer: the
//! verifier's pre-check is a convenience, the constraint behind `insert`
//! is the correctness guarantee. Implementations must therefore surface
//! uniqueness violations distinguishably from other failures.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::booking::{Booking, BookingStatus, PaymentStatus};
use crate::domain::foundation::BookingId;

/// Errors from booking persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The booking's payment reference is already bound to another booking.
    #[error("payment reference already bound to a booking")]
    DuplicateReference,

    /// No booking with the given id exists.
    #[error("booking not found: {0}")]
    NotFound(BookingId),

    /// Any other storage failure.
    #[error("database error: {0}")]
    Database(String),
}

/// Repository port for booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a fully-formed booking in a single atomic commit.
    ///
    /// A confirmed booking is inserted already carrying its reference and
    /// `(confirmed, succeeded)` state, so insert-plus-confirm is one
    /// commit. A concurrent claim of the same reference must fail with
    /// `DuplicateReference` and leave no half-applied row behind.
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError>;

    /// Find a booking by its id. Returns `None` if absent.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError>;

    /// Find the booking holding a payment reference, if any.
    async fn find_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Booking>, RepositoryError>;

    /// Persist a state transition applied by the aggregate.
    async fn update_payment_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn booking_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BookingRepository) {}
    }
}
