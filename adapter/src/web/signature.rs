//! Webhook signature verification.
//!
//! The platform signs every callback with SHA-1 over the shared token, the
//! request timestamp and a nonce. The three values are sorted as byte
//! strings and concatenated without a separator before hashing; the lowercase
//! hex digest travels in the `signature` query parameter.

use sha1::{Digest, Sha1};
use tracing::warn;

/// Compute the signature the platform would send for these inputs.
pub fn compute_signature(token: &str, timestamp: &str, nonce: &str) -> String {
    let mut parts = [token, timestamp, nonce];
    parts.sort_unstable();

    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Verify a webhook signature.
///
/// # Arguments
///
/// * `token` - The shared secret configured on the platform console
/// * `signature` - The 'signature' query parameter
/// * `timestamp` - The 'timestamp' query parameter
/// * `nonce` - The 'nonce' query parameter
///
/// # Returns
///
/// `true` if the digest matches exactly (case-sensitive), `false` otherwise.
/// Any input, including empty strings, yields a deterministic answer.
pub fn verify_signature(token: &str, signature: &str, timestamp: &str, nonce: &str) -> bool {
    let expected_signature = compute_signature(token, timestamp, nonce);

    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!(
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            "wechat_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if signature verification is enabled.
pub fn is_signature_verification_enabled(token: &Option<String>) -> bool {
    token
        .as_ref()
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
}
