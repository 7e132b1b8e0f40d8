//! Webhook signature generation and verification

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC of the request
pub const SIGNATURE_HEADER: &str = "Mogotes-Signature";

/// Header carrying the unix timestamp the signature covers
pub const TIMESTAMP_HEADER: &str = "Mogotes-Timestamp";

/// Sign a webhook body.
///
/// The MAC covers the exact bytes `"{timestamp}.{raw_body}"`; the body is
/// never decoded or re-serialized. Returns lowercase hex.
pub fn sign(timestamp: i64, raw_body: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take any size key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(raw_body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a received signature in constant time.
pub fn verify(raw_body: &[u8], signature: &str, timestamp: i64, secret: &str) -> bool {
    let expected = sign(timestamp, raw_body, secret);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

/// Signing utility bound to one secret
#[derive(Clone)]
pub struct WebhookSignature {
    secret: String,
}

impl WebhookSignature {
    /// Create a new signature utility with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a body for the given timestamp
    pub fn sign(&self, timestamp: i64, raw_body: &[u8]) -> String {
        sign(timestamp, raw_body, &self.secret)
    }

    /// Verify a signature for the given body and timestamp
    pub fn verify(&self, raw_body: &[u8], signature: &str, timestamp: i64) -> bool {
        verify(raw_body, signature, timestamp, &self.secret)
    }
}

impl std::fmt::Debug for WebhookSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSignature")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
