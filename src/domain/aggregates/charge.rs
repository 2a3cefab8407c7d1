//! Charge Aggregate
//!
//! A request for payment tied to a customer. Carries the full status state
//! machine: PENDING is the only initial state, PAID and CANCELLED are
//! terminal, and nothing ever goes back to PENDING.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::events::{ChargeEvent, DomainEvent};
use crate::domain::value_objects::{EntityId, Money};

/// Metadata key that must be present for credit card charges
pub const CARD_DATA_KEY: &str = "cardData";

/// Opaque key-value bag attached to a charge
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Supported payment rails
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    BankSlip,
}

impl PaymentMethod {
    /// Expiration window applied when no explicit expiration is supplied
    pub fn default_expiry(&self) -> Duration {
        match self {
            Self::Pix => Duration::minutes(30),
            Self::CreditCard => Duration::hours(1),
            Self::BankSlip => Duration::days(3),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix => write!(f, "pix"),
            Self::CreditCard => write!(f, "credit_card"),
            Self::BankSlip => write!(f, "bank_slip"),
        }
    }
}

/// Charge lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Failed,
    Expired,
    Cancelled,
}

impl ChargeStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Failed => write!(f, "failed"),
            Self::Expired => write!(f, "expired"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Charge aggregate root
#[derive(Clone, Debug)]
pub struct Charge {
    id: EntityId,
    customer_id: EntityId,
    amount: Money,
    payment_method: PaymentMethod,
    status: ChargeStatus,
    description: Option<String>,
    metadata: Option<Metadata>,
    paid_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Charge {
    /// Create a new pending charge (factory method)
    ///
    /// When no explicit expiration is supplied the payment method's default
    /// window is applied from the creation instant.
    pub fn create(
        customer_id: EntityId,
        amount: Money,
        payment_method: PaymentMethod,
        description: Option<String>,
        metadata: Option<Metadata>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ChargeError> {
        if !amount.is_positive() {
            return Err(ChargeError::NonPositiveAmount);
        }

        let now = Utc::now();
        let id = EntityId::new();
        let expires_at = expires_at.unwrap_or(now + payment_method.default_expiry());

        let mut charge = Self {
            id: id.clone(),
            customer_id: customer_id.clone(),
            amount: amount.clone(),
            payment_method,
            status: ChargeStatus::Pending,
            description,
            metadata,
            paid_at: None,
            expires_at: Some(expires_at),
            failure_reason: None,
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        charge.raise_event(DomainEvent::Charge(ChargeEvent::Created {
            charge_id: id,
            customer_id,
            amount: amount.amount(),
            currency: amount.currency().code().to_string(),
            payment_method,
            created_at: now,
        }));

        Ok(charge)
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
    pub fn customer_id(&self) -> &EntityId {
        &self.customer_id
    }
    pub fn amount(&self) -> &Money {
        &self.amount
    }
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }
    pub fn status(&self) -> ChargeStatus {
        self.status
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChargeStatus::Pending
    }
    pub fn is_paid(&self) -> bool {
        self.status == ChargeStatus::Paid
    }

    /// Apply a status transition, enforcing the lifecycle guards
    ///
    /// `failure_reason` is only meaningful for the FAILED target, where it
    /// overwrites the previous reason even when absent.
    pub fn transition_to(
        &mut self,
        status: ChargeStatus,
        failure_reason: Option<String>,
    ) -> Result<(), ChargeError> {
        self.ensure_open()?;

        match status {
            ChargeStatus::Pending => Err(ChargeError::RevertToPending),
            ChargeStatus::Paid => {
                self.mark_as_paid();
                Ok(())
            }
            ChargeStatus::Failed => {
                self.mark_as_failed(failure_reason);
                Ok(())
            }
            ChargeStatus::Expired => {
                self.mark_as_expired();
                Ok(())
            }
            ChargeStatus::Cancelled => {
                self.cancel();
                Ok(())
            }
        }
    }

    fn mark_as_paid(&mut self) {
        self.status = ChargeStatus::Paid;
        self.paid_at = Some(Utc::now());
        self.touch();

        self.raise_event(DomainEvent::Charge(ChargeEvent::Paid {
            charge_id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            paid_at: self.paid_at.unwrap_or(self.updated_at),
        }));
    }

    fn mark_as_failed(&mut self, reason: Option<String>) {
        self.status = ChargeStatus::Failed;
        self.failure_reason = reason;
        self.touch();

        self.raise_event(DomainEvent::Charge(ChargeEvent::Failed {
            charge_id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            reason: self.failure_reason.clone(),
        }));
    }

    fn mark_as_expired(&mut self) {
        let from = self.status;
        self.status = ChargeStatus::Expired;
        self.touch();

        self.raise_event(DomainEvent::Charge(ChargeEvent::StatusChanged {
            charge_id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            from,
            to: self.status,
        }));
    }

    fn cancel(&mut self) {
        let from = self.status;
        self.status = ChargeStatus::Cancelled;
        self.touch();

        self.raise_event(DomainEvent::Charge(ChargeEvent::StatusChanged {
            charge_id: self.id.clone(),
            customer_id: self.customer_id.clone(),
            from,
            to: self.status,
        }));
    }

    fn ensure_open(&self) -> Result<(), ChargeError> {
        match self.status {
            ChargeStatus::Paid => Err(ChargeError::AlreadyPaid),
            ChargeStatus::Cancelled => Err(ChargeError::AlreadyCancelled),
            _ => Ok(()),
        }
    }

    /// Get and clear accumulated domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChargeError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("cannot change a paid charge")]
    AlreadyPaid,
    #[error("cannot change a cancelled charge")]
    AlreadyCancelled,
    #[error("cannot revert a charge to pending")]
    RevertToPending,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn create_test_charge(method: PaymentMethod) -> Charge {
        Charge::create(
            EntityId::new(),
            Money::brl(Decimal::new(10050, 2)),
            method,
            Some("test charge".into()),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_charge_starts_pending() {
        let charge = create_test_charge(PaymentMethod::Pix);
        assert_eq!(charge.status(), ChargeStatus::Pending);
        assert_eq!(charge.amount().amount(), Decimal::new(10050, 2));
        assert!(charge.paid_at().is_none());
    }

    #[test]
    fn test_default_expiry_per_method() {
        for (method, window) in [
            (PaymentMethod::Pix, Duration::minutes(30)),
            (PaymentMethod::CreditCard, Duration::hours(1)),
            (PaymentMethod::BankSlip, Duration::days(3)),
        ] {
            let charge = create_test_charge(method);
            let expires_at = charge.expires_at().unwrap();
            assert_eq!(expires_at - charge.created_at(), window);
        }
    }

    #[test]
    fn test_explicit_expiry_is_kept() {
        let expires_at = Utc::now() + Duration::days(10);
        let charge = Charge::create(
            EntityId::new(),
            Money::brl(Decimal::ONE),
            PaymentMethod::Pix,
            None,
            None,
            Some(expires_at),
        )
        .unwrap();
        assert_eq!(charge.expires_at(), Some(expires_at));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let result = Charge::create(
            EntityId::new(),
            Money::brl(Decimal::ZERO),
            PaymentMethod::Pix,
            None,
            None,
            None,
        );
        assert_eq!(result.unwrap_err(), ChargeError::NonPositiveAmount);
    }

    #[test]
    fn test_mark_as_paid_stamps_paid_at() {
        let mut charge = create_test_charge(PaymentMethod::Pix);
        charge.transition_to(ChargeStatus::Paid, None).unwrap();
        assert_eq!(charge.status(), ChargeStatus::Paid);
        assert!(charge.paid_at().is_some());
    }

    #[test]
    fn test_paid_is_terminal_for_every_target() {
        for target in [
            ChargeStatus::Pending,
            ChargeStatus::Paid,
            ChargeStatus::Failed,
            ChargeStatus::Expired,
            ChargeStatus::Cancelled,
        ] {
            let mut charge = create_test_charge(PaymentMethod::Pix);
            charge.transition_to(ChargeStatus::Paid, None).unwrap();
            assert_eq!(
                charge.transition_to(target, None),
                Err(ChargeError::AlreadyPaid)
            );
        }
    }

    #[test]
    fn test_cancelled_is_terminal_for_every_target() {
        for target in [
            ChargeStatus::Pending,
            ChargeStatus::Paid,
            ChargeStatus::Failed,
            ChargeStatus::Expired,
            ChargeStatus::Cancelled,
        ] {
            let mut charge = create_test_charge(PaymentMethod::Pix);
            charge.transition_to(ChargeStatus::Cancelled, None).unwrap();
            assert_eq!(
                charge.transition_to(target, None),
                Err(ChargeError::AlreadyCancelled)
            );
        }
    }

    #[test]
    fn test_open_sources_accept_all_non_pending_targets() {
        // FAILED and EXPIRED sources can still move anywhere but PENDING
        for target in [
            ChargeStatus::Paid,
            ChargeStatus::Failed,
            ChargeStatus::Expired,
            ChargeStatus::Cancelled,
        ] {
            let mut charge = create_test_charge(PaymentMethod::Pix);
            charge
                .transition_to(ChargeStatus::Failed, Some("card declined".into()))
                .unwrap();
            assert!(charge.transition_to(target, None).is_ok());
        }
    }

    #[test]
    fn test_no_source_reverts_to_pending() {
        let mut charge = create_test_charge(PaymentMethod::Pix);
        assert_eq!(
            charge.transition_to(ChargeStatus::Pending, None),
            Err(ChargeError::RevertToPending)
        );

        charge.transition_to(ChargeStatus::Expired, None).unwrap();
        assert_eq!(
            charge.transition_to(ChargeStatus::Pending, None),
            Err(ChargeError::RevertToPending)
        );
    }

    #[test]
    fn test_failure_reason_overwrites_always() {
        let mut charge = create_test_charge(PaymentMethod::CreditCard);
        charge
            .transition_to(ChargeStatus::Failed, Some("card declined".into()))
            .unwrap();
        assert_eq!(charge.failure_reason(), Some("card declined"));

        // A later failure without a reason clears the previous one
        charge.transition_to(ChargeStatus::Failed, None).unwrap();
        assert_eq!(charge.failure_reason(), None);
    }

    #[test]
    fn test_events_raised_per_transition() {
        let mut charge = create_test_charge(PaymentMethod::Pix);
        let events = charge.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            DomainEvent::Charge(ChargeEvent::Created { .. })
        ));

        charge.transition_to(ChargeStatus::Paid, None).unwrap();
        let events = charge.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            DomainEvent::Charge(ChargeEvent::Paid { .. })
        ));
    }
}
