//! Foundation types shared across the domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{BookingId, UserId};
pub use state_machine::{IllegalTransition, StateMachine};
