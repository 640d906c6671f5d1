//! TripNest - Travel Booking Backend
//!
//! This crate implements the booking–payment reconciliation core: it decides
//! whether a reservation may be marked paid/confirmed by correlating a local
//! `Booking` record with the state of a payment held by the external payment
//! processor.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
