//! In-memory adapter implementations for tests and local development.

mod booking_repository;

pub use booking_repository::InMemoryBookingRepository;
