//! Inbound ports
//!
//! Use-case traits implemented by the application services, plus the error
//! taxonomy surfaced to callers.

use async_trait::async_trait;
use serde_json::Value;

use crate::application::dto::*;
use crate::domain::aggregates::{Charge, Customer, User, WebhookEvent};
use crate::domain::value_objects::EntityId;
use crate::ports::outbound::RepositoryError;

/// Charge management use cases
#[async_trait]
pub trait ChargeUseCases: Send + Sync {
    /// Create a new pending charge for an existing customer
    async fn create_charge(&self, command: CreateChargeCommand) -> Result<Charge, UseCaseError>;

    /// Apply a status transition to a charge
    async fn update_charge_status(
        &self,
        id: &EntityId,
        command: UpdateChargeStatusCommand,
    ) -> Result<Charge, UseCaseError>;

    async fn find_all_charges(&self) -> Result<Vec<Charge>, UseCaseError>;

    async fn find_charge_by_id(&self, id: &EntityId) -> Result<Charge, UseCaseError>;

    /// Charges for a customer, newest first; the customer must exist
    async fn find_charges_by_customer(
        &self,
        customer_id: &EntityId,
    ) -> Result<Vec<Charge>, UseCaseError>;

    /// Sweep pending charges past their expiration and mark them expired
    async fn expire_overdue_charges(&self) -> Result<Vec<Charge>, UseCaseError>;
}

/// Customer management use cases
#[async_trait]
pub trait CustomerUseCases: Send + Sync {
    /// Create a new customer; email and document must be unique
    async fn create_customer(
        &self,
        command: CreateCustomerCommand,
    ) -> Result<Customer, UseCaseError>;

    async fn find_all_customers(&self) -> Result<Vec<Customer>, UseCaseError>;

    async fn find_customer_by_id(&self, id: &EntityId) -> Result<Customer, UseCaseError>;

    /// Patch identity fields; only supplied values are applied
    async fn update_customer(
        &self,
        id: &EntityId,
        command: UpdateCustomerCommand,
    ) -> Result<Customer, UseCaseError>;

    async fn delete_customer(&self, id: &EntityId) -> Result<(), UseCaseError>;
}

/// User management use cases
#[async_trait]
pub trait UserUseCases: Send + Sync {
    /// Create a new user; email must be unique, roles default to USER
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UseCaseError>;

    async fn find_all_users(&self) -> Result<Vec<User>, UseCaseError>;

    async fn find_user_by_id(&self, id: &EntityId) -> Result<User, UseCaseError>;

    async fn update_user(
        &self,
        id: &EntityId,
        command: UpdateUserCommand,
    ) -> Result<User, UseCaseError>;

    async fn delete_user(&self, id: &EntityId) -> Result<(), UseCaseError>;

    /// Seed the default permissions and roles; safe to run repeatedly
    async fn init_defaults(&self) -> Result<(), UseCaseError>;
}

/// Webhook notification use cases
#[async_trait]
pub trait WebhookUseCases: Send + Sync {
    /// Broadcast an event to every deliverable subscription
    ///
    /// Never fails from the caller's perspective; per-subscriber outcomes are
    /// persisted on the subscriptions and failures are logged.
    async fn send(&self, event: WebhookEvent, data: Value);
}

/// Error taxonomy surfaced by the use cases
#[derive(Debug, Clone, thiserror::Error)]
pub enum UseCaseError {
    /// A referenced entity does not exist
    #[error("{0}")]
    NotFound(String),
    /// A business rule was violated
    #[error("{0}")]
    InvalidArgument(String),
    /// A uniqueness constraint was violated
    #[error("{0}")]
    Conflict(String),
    /// The persistence collaborator failed
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
