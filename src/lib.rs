//! OpenBilling Platform Core
//!
//! Billing and customer-management core following Domain-Driven Design:
//! customers, charges over Brazilian payment rails (PIX, credit card, bank
//! slip), signed outbound webhook notifications, operator accounts, and an
//! in-process metrics service.
//!
//! ## Architecture
//!
//! - **Domain Layer**: Rich aggregates, value objects, domain events
//! - **Application Layer**: Use case orchestration, DTOs
//! - **Ports Layer**: Hexagonal architecture interfaces
//! - **Infrastructure Layer**: Concrete implementations
//!
//! ## Key Aggregates
//!
//! - **Customer**: identity record with unique email and tax document
//! - **Charge**: payment request with a guarded status lifecycle
//! - **Webhook**: notification subscription with delivery bookkeeping
//! - **User**: operator account with role-based permissions
//!
//! HTTP controllers, authentication middleware, and durable persistence are
//! owned by the host application; this crate exposes the use-case services
//! behind trait ports and ships in-memory adapters.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod metrics;
pub mod ports;

// Re-exports for convenience
pub use application::commands::{
    ChargeService, CustomerService, UserService, WebhookDispatcher, WebhookEventPublisher,
    DEFAULT_PERMISSIONS,
};
pub use application::dto::{
    CreateChargeCommand, CreateCustomerCommand, CreateUserCommand, UpdateChargeStatusCommand,
    UpdateCustomerCommand, UpdateUserCommand,
};
pub use domain::aggregates::{
    Charge, ChargeError, ChargeStatus, Customer, Metadata, PaymentMethod, Permission, Role,
    RoleName, User, Webhook, WebhookEvent, WebhookStatus, CARD_DATA_KEY,
};
pub use domain::events::{ChargeEvent, CustomerEvent, DomainEvent};
pub use domain::value_objects::{Currency, Document, Email, EntityId, Money};
pub use infrastructure::delivery::HttpWebhookTransport;
pub use infrastructure::persistence::{
    InMemoryChargeRepository, InMemoryCustomerRepository, InMemoryPermissionRepository,
    InMemoryRoleRepository, InMemoryUserRepository, InMemoryWebhookRepository, NoOpEventPublisher,
};
pub use metrics::{Metric, MetricSummary, MetricsService, Tags, TimerSummary};
pub use ports::inbound::{
    ChargeUseCases, CustomerUseCases, UseCaseError, UserUseCases, WebhookUseCases,
};
pub use ports::outbound::{
    ChargeRepository, CustomerRepository, EventPublisher, PermissionRepository, RepositoryError,
    RoleRepository, TransportError, UserRepository, WebhookPost, WebhookRepository,
    WebhookTransport,
};
