//! Charge application service
//!
//! Orchestrates charge creation, status transitions, and queries. Outbound
//! notifications are handed to the event publisher after the persist
//! succeeds; publisher failures never roll back the business operation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::{CreateChargeCommand, UpdateChargeStatusCommand};
use crate::domain::aggregates::{Charge, ChargeStatus, PaymentMethod, CARD_DATA_KEY};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Currency, EntityId, Money};
use crate::ports::inbound::{ChargeUseCases, UseCaseError};
use crate::ports::outbound::{ChargeRepository, CustomerRepository, EventPublisher};

/// Charge application service
pub struct ChargeService {
    charge_repo: Arc<dyn ChargeRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ChargeService {
    pub fn new(
        charge_repo: Arc<dyn ChargeRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            charge_repo,
            customer_repo,
            event_publisher,
        }
    }

    /// Payment-method-specific input validation
    fn validate_payment_method(command: &CreateChargeCommand) -> Result<(), UseCaseError> {
        match command.payment_method {
            PaymentMethod::Pix => Ok(()),
            PaymentMethod::CreditCard => {
                let has_card_data = command
                    .metadata
                    .as_ref()
                    .map(|m| m.contains_key(CARD_DATA_KEY))
                    .unwrap_or(false);
                if has_card_data {
                    Ok(())
                } else {
                    Err(UseCaseError::InvalidArgument(
                        "credit card data is required for credit card payments".into(),
                    ))
                }
            }
            PaymentMethod::BankSlip => {
                if command.expires_at.is_some() {
                    Ok(())
                } else {
                    Err(UseCaseError::InvalidArgument(
                        "expiration date is required for bank slip payments".into(),
                    ))
                }
            }
        }
    }

    async fn publish(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        if let Err(e) = self.event_publisher.publish(events).await {
            tracing::warn!(error = %e, "failed to publish charge events");
        }
    }
}

#[async_trait]
impl ChargeUseCases for ChargeService {
    async fn create_charge(&self, command: CreateChargeCommand) -> Result<Charge, UseCaseError> {
        let customer_id = EntityId::from_string(&command.customer_id);
        self.customer_repo
            .find_by_id(&customer_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("customer not found".into()))?;

        Self::validate_payment_method(&command)?;

        let amount = Money::new(command.amount, Currency::from_code(&command.currency));
        let mut charge = Charge::create(
            customer_id,
            amount,
            command.payment_method,
            command.description,
            command.metadata,
            command.expires_at,
        )
        .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;

        self.charge_repo.save(&charge).await?;
        self.publish(charge.take_events()).await;

        tracing::debug!(charge_id = %charge.id(), method = %charge.payment_method(), "charge created");
        Ok(charge)
    }

    async fn update_charge_status(
        &self,
        id: &EntityId,
        command: UpdateChargeStatusCommand,
    ) -> Result<Charge, UseCaseError> {
        let mut charge = self
            .charge_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("charge not found".into()))?;

        charge
            .transition_to(command.status, command.failure_reason)
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;

        self.charge_repo.save(&charge).await?;
        self.publish(charge.take_events()).await;

        Ok(charge)
    }

    async fn find_all_charges(&self) -> Result<Vec<Charge>, UseCaseError> {
        Ok(self.charge_repo.find_all().await?)
    }

    async fn find_charge_by_id(&self, id: &EntityId) -> Result<Charge, UseCaseError> {
        self.charge_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("charge not found".into()))
    }

    async fn find_charges_by_customer(
        &self,
        customer_id: &EntityId,
    ) -> Result<Vec<Charge>, UseCaseError> {
        self.customer_repo
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("customer not found".into()))?;

        Ok(self.charge_repo.find_by_customer_id(customer_id).await?)
    }

    async fn expire_overdue_charges(&self) -> Result<Vec<Charge>, UseCaseError> {
        let overdue = self.charge_repo.find_expired_charges().await?;
        let mut expired = Vec::with_capacity(overdue.len());

        for mut charge in overdue {
            charge
                .transition_to(ChargeStatus::Expired, None)
                .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;
            self.charge_repo.save(&charge).await?;
            self.publish(charge.take_events()).await;
            expired.push(charge);
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired overdue charges");
        }
        Ok(expired)
    }
}
