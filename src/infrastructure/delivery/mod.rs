//! HTTP webhook transport
//!
//! reqwest-backed adapter for the `WebhookTransport` port. Each post carries
//! the signature and event headers and a fixed per-request timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::ports::outbound::{TransportError, WebhookPost, WebhookTransport};

/// Per-delivery request timeout
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent sent with every delivery
pub const WEBHOOK_USER_AGENT: &str = "OpenBilling-Webhook/1.0";

/// Signature header carrying the hex HMAC-SHA256 of the body
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Event tag header
pub const EVENT_HEADER: &str = "X-Webhook-Event";

/// reqwest-backed webhook transport
pub struct HttpWebhookTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpWebhookTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DELIVERY_TIMEOUT,
        }
    }

    /// Override the per-delivery timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpWebhookTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhookTransport {
    async fn post(&self, delivery: &WebhookPost) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(&delivery.url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, WEBHOOK_USER_AGENT)
            .header(SIGNATURE_HEADER, &delivery.signature)
            .header(EVENT_HEADER, &delivery.event)
            .body(delivery.body.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(response.status().as_u16())
    }
}
