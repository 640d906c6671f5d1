//! HTTP surface for bookings and payment webhooks.

mod dto;
mod handlers;
mod routes;

pub use dto::{BookingResponse, CreateBookingRequest, ErrorResponse};
pub use handlers::{AuthenticatedUser, BookingApiError, BookingAppState};
pub use routes::booking_routes;
