//! Data Transfer Objects (DTOs)
//!
//! Command objects crossing the inbound boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{ChargeStatus, Metadata, PaymentMethod, RoleName};

// =============================================================================
// Charge Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateChargeCommand {
    pub customer_id: String,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub description: Option<String>,
    pub metadata: Option<Metadata>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateChargeStatusCommand {
    pub status: ChargeStatus,
    pub failure_reason: Option<String>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

// =============================================================================
// Customer Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCustomerCommand {
    pub name: String,
    pub email: String,
    pub document: String,
    pub phone: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateCustomerCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// User Commands
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
    /// Hash produced by the authentication layer; never a raw password
    pub password_hash: String,
    pub roles: Option<Vec<RoleName>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<RoleName>>,
}
