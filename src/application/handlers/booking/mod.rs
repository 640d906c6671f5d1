//! Booking use-case handlers.

mod cancel_booking;
mod create_booking;
mod get_booking;

pub use cancel_booking::{CancelBookingCommand, CancelBookingHandler};
pub use create_booking::{CreateBookingCommand, CreateBookingHandler};
pub use get_booking::{GetBookingHandler, GetBookingQuery};
