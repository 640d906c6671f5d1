//! Signed events delivered by the payment processor.
//!
//! The envelope is the processor's generic event shape: an id, a dotted
//! type tag, and the affected object as raw JSON. Only payment-failure
//! events are acted on; everything else is acknowledged and ignored so new
//! event types never break the endpoint.

use serde::{Deserialize, Serialize};

/// Event types the core distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PspEventKind {
    /// A payment attempt failed at the processor.
    PaymentFailed,
    /// Any other event type; acknowledged without processing.
    Other(String),
}

/// A verified, parsed webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PspEvent {
    /// Processor-assigned event id.
    pub id: String,

    /// Dotted event type tag, e.g. `payment_intent.payment_failed`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// The affected object.
    pub data: PspEventData,
}

/// Payload wrapper around the affected object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PspEventData {
    pub object: serde_json::Value,
}

impl PspEvent {
    /// Classifies the event by its type tag.
    pub fn kind(&self) -> PspEventKind {
        match self.event_type.as_str() {
            "payment_intent.payment_failed" => PspEventKind::PaymentFailed,
            other => PspEventKind::Other(other.to_string()),
        }
    }

    /// The payment reference named by a failure event.
    ///
    /// For failure events the affected object is the payment itself, so the
    /// reference is the object's id. `None` when the payload lacks it.
    pub fn payment_reference(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }
}
