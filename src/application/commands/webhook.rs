//! Webhook dispatch service
//!
//! Broadcasts an event to every deliverable subscription: one task per
//! subscriber, joined as a batch, with per-subscriber outcomes persisted on
//! the subscription record. A subscriber failing, timing out, or panicking
//! never affects the other subscribers or the calling business operation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;
use tokio::task::JoinSet;

use crate::domain::aggregates::{Webhook, WebhookEvent};
use crate::domain::events::DomainEvent;
use crate::ports::inbound::WebhookUseCases;
use crate::ports::outbound::{
    EventPublisher, RepositoryError, WebhookPost, WebhookRepository, WebhookTransport,
};

/// Envelope posted to subscribers; the signature covers its serialized form
#[derive(Debug, Serialize)]
struct WebhookEnvelope {
    event: String,
    data: Value,
    timestamp: String,
}

/// Webhook dispatch service
pub struct WebhookDispatcher {
    webhook_repo: Arc<dyn WebhookRepository>,
    transport: Arc<dyn WebhookTransport>,
}

impl WebhookDispatcher {
    pub fn new(
        webhook_repo: Arc<dyn WebhookRepository>,
        transport: Arc<dyn WebhookTransport>,
    ) -> Self {
        Self {
            webhook_repo,
            transport,
        }
    }
}

#[async_trait]
impl WebhookUseCases for WebhookDispatcher {
    async fn send(&self, event: WebhookEvent, data: Value) {
        let webhooks = match self.webhook_repo.find_by_event(event).await {
            Ok(webhooks) => webhooks,
            Err(e) => {
                tracing::error!(event = %event, error = %e, "failed to load webhook subscriptions");
                return;
            }
        };

        if webhooks.is_empty() {
            tracing::debug!(event = %event, "no webhook subscriptions for event");
            return;
        }

        let mut deliveries = JoinSet::new();
        for webhook in webhooks.into_iter().filter(Webhook::can_deliver) {
            let repo = Arc::clone(&self.webhook_repo);
            let transport = Arc::clone(&self.transport);
            let data = data.clone();
            deliveries.spawn(deliver(repo, transport, webhook, event, data));
        }

        while let Some(joined) = deliveries.join_next().await {
            if let Err(e) = joined {
                tracing::error!(event = %event, error = %e, "webhook delivery task failed");
            }
        }
    }
}

/// Deliver one envelope to one subscriber and persist the outcome
async fn deliver(
    repo: Arc<dyn WebhookRepository>,
    transport: Arc<dyn WebhookTransport>,
    mut webhook: Webhook,
    event: WebhookEvent,
    data: Value,
) {
    let envelope = WebhookEnvelope {
        event: event.to_string(),
        data,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let body = match serde_json::to_string(&envelope) {
        Ok(body) => body,
        Err(e) => {
            webhook.mark_as_failed(e.to_string());
            persist(&repo, &webhook).await;
            return;
        }
    };

    let post = WebhookPost {
        url: webhook.url().to_string(),
        event: envelope.event,
        signature: sign(&body, webhook.secret()),
        body,
    };

    match transport.post(&post).await {
        Ok(status) if (200..300).contains(&status) => {
            webhook.mark_as_delivered();
            tracing::info!(url = %webhook.url(), event = %event, "webhook delivered");
        }
        Ok(status) => {
            webhook.mark_as_failed(format!("HTTP {status}"));
            tracing::warn!(url = %webhook.url(), event = %event, status, "webhook delivery failed");
        }
        Err(e) => {
            webhook.mark_as_failed(e.to_string());
            tracing::warn!(url = %webhook.url(), event = %event, error = %e, "webhook delivery error");
        }
    }

    persist(&repo, &webhook).await;
}

async fn persist(repo: &Arc<dyn WebhookRepository>, webhook: &Webhook) {
    if let Err(e) = repo.save(webhook).await {
        tracing::error!(url = %webhook.url(), error = %e, "failed to persist webhook state");
    }
}

/// Hex HMAC-SHA256 of the payload under the subscription secret
fn sign(payload: &str, secret: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Publishes domain events as webhook notifications
pub struct WebhookEventPublisher {
    dispatcher: Arc<WebhookDispatcher>,
}

impl WebhookEventPublisher {
    pub fn new(dispatcher: Arc<WebhookDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl EventPublisher for WebhookEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in events {
            self.dispatcher
                .send(event.webhook_event(), event.payload())
                .await;
        }
        Ok(())
    }
}
