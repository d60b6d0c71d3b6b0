//! Outbound webhook signing.
//!
//! Platforms that configure a signing key receive an HMAC-SHA256 signature
//! with each delivery so they can authenticate the dispatcher.

pub mod signature;

pub use signature::{compute_signature, signature_headers, SIGNATURE_HEADER, TIMESTAMP_HEADER};
