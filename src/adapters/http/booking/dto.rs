//! Request and response DTOs for the booking endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingSubject};

/// Request body for POST /api/bookings.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// What to book; tagged by `kind` ("hotel" or "flight").
    pub subject: BookingSubject,

    /// Total price in major currency units, e.g. 19.99.
    pub total_price: Decimal,

    /// ISO 4217 currency code; server default applies when omitted.
    pub currency: Option<String>,

    /// Reference of an already-completed payment to claim. Omitted for
    /// pay-later bookings.
    pub payment_reference: Option<String>,
}

/// A booking as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub subject: BookingSubject,
    pub total_price: Decimal,
    pub currency: String,
    pub payment_reference: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            subject: booking.subject,
            total_price: booking.total_price,
            currency: booking.currency.as_str().to_string(),
            payment_reference: booking.payment_reference,
            status: booking.status.as_str().to_string(),
            payment_status: booking.payment_status.as_str().to_string(),
            created_at: booking.created_at,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
