//! Outbound sync of a generated report to the spreadsheet webhook.
//!
//! The webhook (a Google Apps Script endpoint) is the only long-latency
//! collaborator in the system. Requests carry a hard timeout, and a
//! timeout is reported distinctly from other transport failures; nothing
//! is retried here.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Webhook requests time out after this long. The remote script may keep
/// running past it.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(60);

const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The webhook did not answer within [`SYNC_TIMEOUT`].
    #[error("webhook request timed out after {}s", SYNC_TIMEOUT.as_secs())]
    Timeout,
    #[error("invalid webhook url: {0}")]
    InvalidUrl(String),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("webhook request failed: {0}")]
    Http(reqwest::Error),
    /// The webhook answered with something that is not JSON, typically a
    /// sign-in or error page.
    #[error("webhook returned invalid JSON (status {status}): {preview}")]
    InvalidResponse { status: u16, preview: String },
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

/// POSTs the report payload to the webhook and returns its JSON response.
pub async fn push_report<C: HttpClient>(
    client: &C,
    url: &str,
    payload: &Value,
) -> Result<Value, SyncError> {
    let target = url
        .parse()
        .map_err(|_| SyncError::InvalidUrl(url.to_owned()))?;

    let mut request = reqwest::Request::new(reqwest::Method::POST, target);
    *request.timeout_mut() = Some(SYNC_TIMEOUT);
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *request.body_mut() = Some(serde_json::to_vec(payload)?.into());

    info!(url, "Pushing report to webhook");

    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => return Err(SyncError::Timeout),
        Err(e) => return Err(SyncError::Http(e)),
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) if e.is_timeout() => return Err(SyncError::Timeout),
        Err(e) => return Err(SyncError::Http(e)),
    };

    match serde_json::from_str::<Value>(&body) {
        Ok(value) => {
            info!(status = status.as_u16(), "Webhook sync complete");
            Ok(value)
        }
        Err(_) => {
            warn!(status = status.as_u16(), "Webhook returned a non-JSON body");
            Err(SyncError::InvalidResponse {
                status: status.as_u16(),
                preview: body.chars().take(BODY_PREVIEW_CHARS).collect(),
            })
        }
    }
}
