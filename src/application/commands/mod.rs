//! Application services
//!
//! Use-case orchestration over the domain aggregates and outbound ports.

pub mod charge;
pub mod customer;
pub mod user;
pub mod webhook;

pub use charge::ChargeService;
pub use customer::CustomerService;
pub use user::{UserService, DEFAULT_PERMISSIONS};
pub use webhook::{WebhookDispatcher, WebhookEventPublisher};
