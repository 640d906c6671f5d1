//! GetBookingHandler - Query handler for retrieving a booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::{BookingId, UserId};
use crate::ports::BookingRepository;

/// Query to fetch one booking for its owner.
#[derive(Debug, Clone)]
pub struct GetBookingQuery {
    pub booking_id: BookingId,
    pub user_id: UserId,
}

/// Handler for retrieving a booking.
///
/// Another user's booking reads as absent, so the endpoint does not leak
/// which booking ids exist.
pub struct GetBookingHandler {
    repository: Arc<dyn BookingRepository>,
}

impl GetBookingHandler {
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetBookingQuery) -> Result<Booking, BookingError> {
        let booking = self
            .repository
            .find_by_id(&query.booking_id)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?
            .filter(|b| b.user_id == query.user_id)
            .ok_or(BookingError::NotFound)?;
        Ok(booking)
    }
}
