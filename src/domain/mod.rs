//! Domain layer.
//!
//! Pure business logic with no I/O: booking lifecycle, payment verification
//! rules, and the shared foundation types they are built on.

pub mod booking;
pub mod foundation;
pub mod payment;
