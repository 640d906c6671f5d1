//! Ports: contracts the domain consumes, implemented by adapters.

mod booking_repository;
mod payment_processor;

pub use booking_repository::{BookingRepository, RepositoryError};
pub use payment_processor::{
    PaymentProcessorClient, PaymentRecord, PaymentRecordStatus, ProcessorError,
};
