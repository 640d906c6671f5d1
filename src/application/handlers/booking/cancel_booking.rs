//! CancelBookingHandler - Command handler for cancelling a booking.

use std::sync::Arc;
use tracing::info;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::{BookingId, UserId};
use crate::ports::BookingRepository;

/// Command to cancel a booking.
#[derive(Debug, Clone)]
pub struct CancelBookingCommand {
    pub booking_id: BookingId,
    pub user_id: UserId,
}

/// Handler for user-initiated cancellation.
///
/// Cancellation is terminal: once applied, no payment event reopens the
/// booking, and cancelling again is a conflict.
pub struct CancelBookingHandler {
    repository: Arc<dyn BookingRepository>,
}

impl CancelBookingHandler {
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CancelBookingCommand) -> Result<Booking, BookingError> {
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?
            .filter(|b| b.user_id == cmd.user_id)
            .ok_or(BookingError::NotFound)?;

        booking.cancel()?;

        self.repository
            .update_payment_status(&booking.id, booking.status, booking.payment_status)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        info!(booking_id = %booking.id, "booking cancelled");
        Ok(booking)
    }
}
