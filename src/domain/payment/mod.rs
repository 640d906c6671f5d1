//! Payment domain module.
//!
//! Minor-unit currency conversion, synchronous payment verification, and
//! webhook authentication/processing. Everything here is either pure or
//! speaks to the outside world through the ports.

mod currency;
mod event;
mod signature;
mod verifier;
mod webhook_processor;

pub use currency::{to_minor_units, CurrencyCode, CurrencyError, ZERO_DECIMAL_CURRENCIES};
pub use event::{PspEvent, PspEventData, PspEventKind};
pub use signature::{SignatureError, SignatureHeader, WebhookSignatureVerifier};
pub use verifier::{PaymentVerifier, VerifiedPayment};
pub use webhook_processor::{WebhookAck, WebhookError, WebhookProcessor};
