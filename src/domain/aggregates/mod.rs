//! Aggregate roots

pub mod charge;
pub mod customer;
pub mod user;
pub mod webhook;

pub use charge::{Charge, ChargeError, ChargeStatus, Metadata, PaymentMethod, CARD_DATA_KEY};
pub use customer::Customer;
pub use user::{Permission, Role, RoleName, User};
pub use webhook::{Webhook, WebhookEvent, WebhookStatus};
