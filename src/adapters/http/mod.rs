//! HTTP adapter: axum routes, handlers, and DTOs.

pub mod booking;
