//! Helpers for building valid `stripe-signature` headers in tests.

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// A signature header for `payload` timestamped now.
pub fn stripe_signature(secret: &str, payload: &str) -> String {
    stripe_signature_at(secret, payload, chrono::Utc::now().timestamp())
}

/// A signature header with an explicit timestamp, for tolerance tests.
pub fn stripe_signature_at(secret: &str, payload: &str, timestamp: i64) -> String {
    let signed_payload = format!("{timestamp}.{payload}");
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(signed_payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}
