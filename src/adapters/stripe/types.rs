//! Stripe API wire types.

use serde::Deserialize;
use std::collections::HashMap;

use crate::ports::{PaymentRecord, PaymentRecordStatus};

/// A Stripe PaymentIntent, reduced to the fields this core reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    /// Nominal amount in the currency's minor units.
    pub amount: i64,
    /// Amount actually captured.
    pub amount_received: Option<i64>,
    /// Lowercase ISO 4217 code.
    pub currency: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl From<PaymentIntent> for PaymentRecord {
    fn from(intent: PaymentIntent) -> Self {
        PaymentRecord {
            reference: intent.id,
            status: PaymentRecordStatus::from_str(&intent.status),
            amount: intent.amount,
            amount_received: intent.amount_received,
            currency: intent.currency,
            metadata: intent.metadata,
        }
    }
}

/// Error envelope Stripe wraps failed API responses in.
#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: String,
}
