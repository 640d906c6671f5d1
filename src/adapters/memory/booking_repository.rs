//! In-memory implementation of BookingRepository.
//!
//! Mirrors the semantics of the PostgreSQL adapter, including reference
//! uniqueness: the check and the insert happen under one write lock, so
//! concurrent claims of the same payment reference serialize exactly as
//! they do against the database's unique index.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::{Booking, BookingStatus, PaymentStatus};
use crate::domain::foundation::BookingId;
use crate::ports::{BookingRepository, RepositoryError};

/// In-memory booking store keyed by booking id.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bookings.
    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        if let Some(reference) = &booking.payment_reference {
            let taken = bookings
                .values()
                .any(|b| b.payment_reference.as_ref() == Some(reference));
            if taken {
                return Err(RepositoryError::DuplicateReference);
            }
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn find_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Booking>, RepositoryError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.payment_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn update_payment_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings.get_mut(id).ok_or(RepositoryError::NotFound(*id))?;
        booking.status = status;
        booking.payment_status = payment_status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::domain::booking::{BookingDraft, BookingSubject};
    use crate::domain::foundation::UserId;
    use crate::domain::payment::{CurrencyCode, VerifiedPayment};

    fn draft() -> BookingDraft {
        BookingDraft::new(
            UserId::new("user-1").unwrap(),
            BookingSubject::Flight {
                flight_id: Uuid::new_v4(),
            },
            dec!(19.99),
            CurrencyCode::parse("USD").unwrap(),
        )
        .unwrap()
    }

    fn confirmed(reference: &str) -> Booking {
        Booking::confirmed(
            draft(),
            VerifiedPayment {
                reference: reference.to_string(),
                currency: CurrencyCode::parse("USD").unwrap(),
                status: "succeeded".to_string(),
            },
            chrono::Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_and_find_roundtrip() {
        let repo = InMemoryBookingRepository::new();
        let booking = confirmed("pi_1");
        repo.insert(&booking).await.unwrap();

        let found = repo.find_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(found, booking);
        let by_ref = repo.find_by_payment_reference("pi_1").await.unwrap().unwrap();
        assert_eq!(by_ref.id, booking.id);
    }

    #[tokio::test]
    async fn duplicate_reference_is_rejected() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(&confirmed("pi_1")).await.unwrap();

        let err = repo.insert(&confirmed("pi_1")).await.unwrap_err();
        assert_eq!(err, RepositoryError::DuplicateReference);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn bookings_without_references_do_not_collide() {
        let repo = InMemoryBookingRepository::new();
        repo.insert(&Booking::pending(draft(), chrono::Utc::now()))
            .await
            .unwrap();
        repo.insert(&Booking::pending(draft(), chrono::Utc::now()))
            .await
            .unwrap();
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn update_missing_booking_is_not_found() {
        let repo = InMemoryBookingRepository::new();
        let err = repo
            .update_payment_status(&BookingId::new(), BookingStatus::Pending, PaymentStatus::Failed)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_changes_stored_state() {
        let repo = InMemoryBookingRepository::new();
        let booking = confirmed("pi_1");
        repo.insert(&booking).await.unwrap();

        repo.update_payment_status(&booking.id, BookingStatus::Pending, PaymentStatus::Failed)
            .await
            .unwrap();

        let found = repo.find_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(found.status, BookingStatus::Pending);
        assert_eq!(found.payment_status, PaymentStatus::Failed);
        // Reference survives the failure transition.
        assert_eq!(found.payment_reference.as_deref(), Some("pi_1"));
    }
}
