//! Webhook Aggregate
//!
//! Outbound notification subscription: a URL, the event tags it listens to,
//! and the signing secret, plus per-subscription delivery bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::EntityId;

/// Domain event tags a subscription can listen to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "charge.created")]
    ChargeCreated,
    #[serde(rename = "charge.updated")]
    ChargeUpdated,
    #[serde(rename = "charge.paid")]
    ChargePaid,
    #[serde(rename = "charge.failed")]
    ChargeFailed,
    #[serde(rename = "customer.created")]
    CustomerCreated,
    #[serde(rename = "customer.updated")]
    CustomerUpdated,
    #[serde(rename = "customer.deleted")]
    CustomerDeleted,
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChargeCreated => write!(f, "charge.created"),
            Self::ChargeUpdated => write!(f, "charge.updated"),
            Self::ChargePaid => write!(f, "charge.paid"),
            Self::ChargeFailed => write!(f, "charge.failed"),
            Self::CustomerCreated => write!(f, "customer.created"),
            Self::CustomerUpdated => write!(f, "customer.updated"),
            Self::CustomerDeleted => write!(f, "customer.deleted"),
        }
    }
}

/// Subscription delivery status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Pending,
    Delivered,
    Failed,
    Disabled,
}

/// Webhook subscription aggregate root
#[derive(Clone, Debug)]
pub struct Webhook {
    id: EntityId,
    url: String,
    events: Vec<WebhookEvent>,
    secret: String,
    status: WebhookStatus,
    retry_count: u32,
    last_delivery_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Webhook {
    /// Create a new subscription (factory method)
    pub fn new(url: impl Into<String>, events: Vec<WebhookEvent>, secret: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(),
            url: url.into(),
            events,
            secret: secret.into(),
            status: WebhookStatus::Pending,
            retry_count: 0,
            last_delivery_at: None,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
    pub fn url(&self) -> &str {
        &self.url
    }
    pub fn events(&self) -> &[WebhookEvent] {
        &self.events
    }
    pub fn secret(&self) -> &str {
        &self.secret
    }
    pub fn status(&self) -> WebhookStatus {
        self.status
    }
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }
    pub fn last_delivery_at(&self) -> Option<DateTime<Utc>> {
        self.last_delivery_at
    }
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this subscription listens to the given event tag
    pub fn subscribes_to(&self, event: WebhookEvent) -> bool {
        self.events.contains(&event)
    }

    /// Deliverable while PENDING or FAILED; DISABLED and freshly DELIVERED
    /// subscriptions are skipped
    pub fn can_deliver(&self) -> bool {
        matches!(self.status, WebhookStatus::Pending | WebhookStatus::Failed)
    }

    pub fn mark_as_delivered(&mut self) {
        self.status = WebhookStatus::Delivered;
        self.last_delivery_at = Some(Utc::now());
        self.retry_count = 0;
        self.last_error = None;
        self.touch();
    }

    pub fn mark_as_failed(&mut self, error: impl Into<String>) {
        self.status = WebhookStatus::Failed;
        self.last_error = Some(error.into());
        self.retry_count += 1;
        self.touch();
    }

    pub fn disable(&mut self) {
        self.status = WebhookStatus::Disabled;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
