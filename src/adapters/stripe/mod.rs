//! Stripe adapter.
//!
//! Implements the `PaymentProcessorClient` port against the Stripe API.

mod client;
mod types;

pub use client::StripeClient;
pub use types::PaymentIntent;
