//! Domain Events
//!
//! Events raised by aggregates to communicate state changes. Each event maps
//! to a webhook event tag and carries the payload broadcast to subscribers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::domain::aggregates::charge::{ChargeStatus, PaymentMethod};
use crate::domain::aggregates::webhook::WebhookEvent;
use crate::domain::value_objects::{Email, EntityId};

/// All domain events in the billing bounded context
#[derive(Clone, Debug)]
pub enum DomainEvent {
    Charge(ChargeEvent),
    Customer(CustomerEvent),
}

/// Charge-related domain events
#[derive(Clone, Debug)]
pub enum ChargeEvent {
    Created {
        charge_id: EntityId,
        customer_id: EntityId,
        amount: Decimal,
        currency: String,
        payment_method: PaymentMethod,
        created_at: DateTime<Utc>,
    },

    Paid {
        charge_id: EntityId,
        customer_id: EntityId,
        paid_at: DateTime<Utc>,
    },

    Failed {
        charge_id: EntityId,
        customer_id: EntityId,
        reason: Option<String>,
    },

    StatusChanged {
        charge_id: EntityId,
        customer_id: EntityId,
        from: ChargeStatus,
        to: ChargeStatus,
    },
}

/// Customer-related domain events
#[derive(Clone, Debug)]
pub enum CustomerEvent {
    Created {
        customer_id: EntityId,
        email: Email,
        created_at: DateTime<Utc>,
    },

    Updated {
        customer_id: EntityId,
        updated_at: DateTime<Utc>,
    },

    Deleted {
        customer_id: EntityId,
    },
}

impl DomainEvent {
    /// Get the aggregate ID this event belongs to
    pub fn aggregate_id(&self) -> &EntityId {
        match self {
            DomainEvent::Charge(e) => match e {
                ChargeEvent::Created { charge_id, .. } => charge_id,
                ChargeEvent::Paid { charge_id, .. } => charge_id,
                ChargeEvent::Failed { charge_id, .. } => charge_id,
                ChargeEvent::StatusChanged { charge_id, .. } => charge_id,
            },
            DomainEvent::Customer(e) => match e {
                CustomerEvent::Created { customer_id, .. } => customer_id,
                CustomerEvent::Updated { customer_id, .. } => customer_id,
                CustomerEvent::Deleted { customer_id } => customer_id,
            },
        }
    }

    /// The webhook event tag this event is broadcast under
    pub fn webhook_event(&self) -> WebhookEvent {
        match self {
            DomainEvent::Charge(e) => match e {
                ChargeEvent::Created { .. } => WebhookEvent::ChargeCreated,
                ChargeEvent::Paid { .. } => WebhookEvent::ChargePaid,
                ChargeEvent::Failed { .. } => WebhookEvent::ChargeFailed,
                ChargeEvent::StatusChanged { .. } => WebhookEvent::ChargeUpdated,
            },
            DomainEvent::Customer(e) => match e {
                CustomerEvent::Created { .. } => WebhookEvent::CustomerCreated,
                CustomerEvent::Updated { .. } => WebhookEvent::CustomerUpdated,
                CustomerEvent::Deleted { .. } => WebhookEvent::CustomerDeleted,
            },
        }
    }

    /// The notification payload delivered to subscribers
    pub fn payload(&self) -> Value {
        match self {
            DomainEvent::Charge(e) => match e {
                ChargeEvent::Created {
                    charge_id,
                    customer_id,
                    amount,
                    currency,
                    payment_method,
                    created_at,
                } => json!({
                    "chargeId": charge_id.as_str(),
                    "customerId": customer_id.as_str(),
                    "amount": amount,
                    "currency": currency,
                    "paymentMethod": payment_method.to_string(),
                    "createdAt": created_at.to_rfc3339(),
                }),
                ChargeEvent::Paid {
                    charge_id,
                    customer_id,
                    paid_at,
                } => json!({
                    "chargeId": charge_id.as_str(),
                    "customerId": customer_id.as_str(),
                    "paidAt": paid_at.to_rfc3339(),
                }),
                ChargeEvent::Failed {
                    charge_id,
                    customer_id,
                    reason,
                } => json!({
                    "chargeId": charge_id.as_str(),
                    "customerId": customer_id.as_str(),
                    "failureReason": reason,
                }),
                ChargeEvent::StatusChanged {
                    charge_id,
                    customer_id,
                    from,
                    to,
                } => json!({
                    "chargeId": charge_id.as_str(),
                    "customerId": customer_id.as_str(),
                    "from": from.to_string(),
                    "to": to.to_string(),
                }),
            },
            DomainEvent::Customer(e) => match e {
                CustomerEvent::Created {
                    customer_id,
                    email,
                    created_at,
                } => json!({
                    "customerId": customer_id.as_str(),
                    "email": email.as_str(),
                    "createdAt": created_at.to_rfc3339(),
                }),
                CustomerEvent::Updated {
                    customer_id,
                    updated_at,
                } => json!({
                    "customerId": customer_id.as_str(),
                    "updatedAt": updated_at.to_rfc3339(),
                }),
                CustomerEvent::Deleted { customer_id } => json!({
                    "customerId": customer_id.as_str(),
                }),
            },
        }
    }
}
