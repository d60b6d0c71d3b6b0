//! One webhook delivery attempt.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::config::PlatformConfig;
use crate::util::time::unix_timestamp;
use crate::webhook::signature_headers;

use super::PublishPayload;

/// A delivery attempt that did not reach a success response.
///
/// Never fatal to the pass: the pair stays queued and is retried on a
/// future run.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// POST one payload to a platform webhook.
///
/// Sends the bearer token when configured and signs the exact body bytes
/// when the platform has a signing key. Responses in 200..400 count as
/// delivered; anything else is a `DeliveryError`.
pub async fn deliver(
    client: &Client,
    endpoint: &Url,
    platform: &PlatformConfig,
    payload: &PublishPayload,
    timeout: Duration,
) -> Result<u16, DeliveryError> {
    let body = serde_json::to_vec(payload)?;

    info!(
        platform = %platform.name,
        endpoint = %endpoint,
        body_length = body.len(),
        "publish_post_starting"
    );

    let mut request = client
        .post(endpoint.clone())
        .timeout(timeout)
        .header("Content-Type", "application/json");

    if let Some(token) = platform.token.as_deref().filter(|t| !t.trim().is_empty()) {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    if let Some(key) = platform
        .signing_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
    {
        let timestamp = unix_timestamp();
        if let Some(headers) = signature_headers(key, &timestamp, &body) {
            for (name, value) in headers {
                request = request.header(name, value);
            }
        }
    }

    match request.body(body).send().await {
        Ok(resp) => {
            let status = resp.status().as_u16();

            if (200..400).contains(&status) {
                info!(
                    platform = %platform.name,
                    endpoint = %endpoint,
                    status_code = status,
                    "publish_post_complete"
                );
                Ok(status)
            } else {
                error!(
                    platform = %platform.name,
                    endpoint = %endpoint,
                    status_code = status,
                    "publish_post_rejected"
                );
                Err(DeliveryError::Status { status })
            }
        }
        Err(e) => {
            if e.is_timeout() {
                error!(
                    platform = %platform.name,
                    endpoint = %endpoint,
                    timeout_ms = timeout.as_millis() as u64,
                    error = %e,
                    "publish_post_timeout"
                );
            } else {
                error!(
                    platform = %platform.name,
                    endpoint = %endpoint,
                    error = %e,
                    "publish_post_error"
                );
            }
            Err(DeliveryError::Request(e))
        }
    }
}
