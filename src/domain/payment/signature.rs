//! Webhook signature verification.
//!
//! The processor signs each delivery with HMAC-SHA256 over
//! `"{timestamp}.{payload}"` and sends the result in a
//! `t=<ts>,v1=<hex>` header. Verification uses constant-time comparison
//! and rejects stale timestamps to blunt replay attacks.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Maximum allowed age for a signed delivery (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for deliveries dated in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Errors from signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The header could not be parsed into timestamp + signature.
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),

    /// The signature did not match, or the timestamp fell outside the
    /// acceptance window.
    #[error("signature verification failed")]
    Invalid,
}

/// Parsed components of the signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp the signature was generated at.
    pub timestamp: i64,
    /// HMAC-SHA256 signature bytes.
    pub signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a `t=<timestamp>,v1=<hex>` header.
    ///
    /// Unknown key/value pairs are ignored for forward compatibility.
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut timestamp: Option<i64> = None;
        let mut signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                SignatureError::MalformedHeader("expected key=value pairs".to_string())
            })?;
            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        SignatureError::MalformedHeader("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    signature = Some(hex::decode(value).map_err(|_| {
                        SignatureError::MalformedHeader("invalid signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| SignatureError::MalformedHeader("missing timestamp".to_string()))?;
        let signature = signature
            .ok_or_else(|| SignatureError::MalformedHeader("missing v1 signature".to_string()))?;

        Ok(Self {
            timestamp,
            signature,
        })
    }
}

/// Verifies signed webhook payloads against a shared secret.
pub struct WebhookSignatureVerifier {
    secret: String,
}

impl WebhookSignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies a payload against its signature header.
    ///
    /// Returns `Ok(())` only when the timestamp is within the acceptance
    /// window and the HMAC matches.
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), SignatureError> {
        let header = SignatureHeader::parse(signature_header)?;
        self.validate_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected, &header.signature) {
            return Err(SignatureError::Invalid);
        }
        Ok(())
    }

    fn validate_timestamp(&self, timestamp: i64) -> Result<(), SignatureError> {
        let age = chrono::Utc::now().timestamp() - timestamp;
        if age > MAX_EVENT_AGE_SECS || age < -MAX_CLOCK_SKEW_SECS {
            return Err(SignatureError::Invalid);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a valid signature header value for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
