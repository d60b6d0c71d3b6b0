//! Outbound payload signing.
//!
//! Each signed delivery carries two headers:
//! - `X-Publish-Timestamp`: Unix epoch seconds when the request was built
//! - `X-Publish-Signature`: HMAC-SHA256 hex digest of timestamp + body
//!
//! Receivers recompute the digest with the shared key to authenticate the
//! dispatcher and can reject stale timestamps to prevent replay.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Publish-Timestamp";

/// Header carrying the hex HMAC digest.
pub const SIGNATURE_HEADER: &str = "X-Publish-Signature";

/// Compute the hex HMAC-SHA256 digest of timestamp + body.
pub fn compute_signature(signing_key: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(signing_key.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("signing_key_invalid");
            return None;
        }
    };

    mac.update(timestamp.as_bytes());
    mac.update(body);

    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Build the signature header pair for a delivery.
pub fn signature_headers(
    signing_key: &str,
    timestamp: &str,
    body: &[u8],
) -> Option<[(&'static str, String); 2]> {
    let signature = compute_signature(signing_key, timestamp, body)?;
    Some([
        (TIMESTAMP_HEADER, timestamp.to_string()),
        (SIGNATURE_HEADER, signature),
    ])
}
