//! Outbound ports
//!
//! Interfaces the infrastructure layer must implement: persistence for each
//! aggregate, the event publisher, and the webhook HTTP transport.

use async_trait::async_trait;

use crate::domain::aggregates::{
    Charge, ChargeStatus, Customer, PaymentMethod, Permission, Role, RoleName, User, Webhook,
    WebhookEvent,
};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Document, Email, EntityId};

/// Customer repository port
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_document(
        &self,
        document: &Document,
    ) -> Result<Option<Customer>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Save customer (insert or update)
    async fn save(&self, customer: &Customer) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError>;
}

/// Charge repository port
#[async_trait]
pub trait ChargeRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Charge>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Charge>, RepositoryError>;

    /// Charges for a customer, newest first
    async fn find_by_customer_id(
        &self,
        customer_id: &EntityId,
    ) -> Result<Vec<Charge>, RepositoryError>;

    async fn find_by_status(&self, status: ChargeStatus) -> Result<Vec<Charge>, RepositoryError>;

    async fn find_by_payment_method(
        &self,
        payment_method: PaymentMethod,
    ) -> Result<Vec<Charge>, RepositoryError>;

    /// Pending charges whose expiration instant has passed
    async fn find_expired_charges(&self) -> Result<Vec<Charge>, RepositoryError>;

    async fn find_pending_charges(&self) -> Result<Vec<Charge>, RepositoryError>;

    /// Save charge (insert or update)
    async fn save(&self, charge: &Charge) -> Result<(), RepositoryError>;
}

/// Webhook subscription repository port
#[async_trait]
pub trait WebhookRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Webhook>, RepositoryError>;

    /// Subscriptions listening to the given event tag
    async fn find_by_event(&self, event: WebhookEvent) -> Result<Vec<Webhook>, RepositoryError>;

    async fn find_by_url(&self, url: &str) -> Result<Option<Webhook>, RepositoryError>;

    /// Subscriptions that are not disabled
    async fn find_active(&self) -> Result<Vec<Webhook>, RepositoryError>;

    /// Save subscription (insert or update)
    async fn save(&self, webhook: &Webhook) -> Result<(), RepositoryError>;
}

/// User repository port
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError>;
}

/// Role repository port
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: RoleName) -> Result<Option<Role>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Role>, RepositoryError>;

    async fn save(&self, role: &Role) -> Result<(), RepositoryError>;
}

/// Permission repository port
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Permission>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Permission>, RepositoryError>;

    async fn save(&self, permission: &Permission) -> Result<(), RepositoryError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events raised by an aggregate
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// A signed webhook envelope ready to be posted
#[derive(Clone, Debug)]
pub struct WebhookPost {
    pub url: String,
    pub event: String,
    pub body: String,
    pub signature: String,
}

/// Webhook HTTP transport port
///
/// Returns the response status code; transport-level failures (connect,
/// timeout) surface as `TransportError`.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, delivery: &WebhookPost) -> Result<u16, TransportError>;
}

/// Transport-level delivery error
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Repository error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}
