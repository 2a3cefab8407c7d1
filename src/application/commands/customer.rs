//! Customer application service
//!
//! CRUD over the customer aggregate. Email uniqueness is checked before
//! document uniqueness, so an email conflict masks a simultaneous document
//! conflict.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::{CreateCustomerCommand, UpdateCustomerCommand};
use crate::domain::aggregates::Customer;
use crate::domain::events::{CustomerEvent, DomainEvent};
use crate::domain::value_objects::{Document, Email, EntityId};
use crate::ports::inbound::{CustomerUseCases, UseCaseError};
use crate::ports::outbound::{CustomerRepository, EventPublisher};

/// Customer application service
pub struct CustomerService {
    customer_repo: Arc<dyn CustomerRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CustomerService {
    pub fn new(
        customer_repo: Arc<dyn CustomerRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            customer_repo,
            event_publisher,
        }
    }

    async fn publish(&self, events: Vec<DomainEvent>) {
        if events.is_empty() {
            return;
        }
        if let Err(e) = self.event_publisher.publish(events).await {
            tracing::warn!(error = %e, "failed to publish customer events");
        }
    }
}

#[async_trait]
impl CustomerUseCases for CustomerService {
    async fn create_customer(
        &self,
        command: CreateCustomerCommand,
    ) -> Result<Customer, UseCaseError> {
        let email = Email::new(&command.email)
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;
        let document = Document::new(&command.document)
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;

        if self.customer_repo.find_by_email(&email).await?.is_some() {
            return Err(UseCaseError::Conflict(
                "a customer with this email already exists".into(),
            ));
        }

        if self
            .customer_repo
            .find_by_document(&document)
            .await?
            .is_some()
        {
            return Err(UseCaseError::Conflict(
                "a customer with this document already exists".into(),
            ));
        }

        let mut customer = Customer::create(command.name, email, document, command.phone);
        self.customer_repo.save(&customer).await?;
        self.publish(customer.take_events()).await;

        tracing::debug!(customer_id = %customer.id(), "customer created");
        Ok(customer)
    }

    async fn find_all_customers(&self) -> Result<Vec<Customer>, UseCaseError> {
        Ok(self.customer_repo.find_all().await?)
    }

    async fn find_customer_by_id(&self, id: &EntityId) -> Result<Customer, UseCaseError> {
        self.customer_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("customer not found".into()))
    }

    async fn update_customer(
        &self,
        id: &EntityId,
        command: UpdateCustomerCommand,
    ) -> Result<Customer, UseCaseError> {
        let mut customer = self
            .customer_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("customer not found".into()))?;

        let email = command
            .email
            .map(Email::new)
            .transpose()
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;
        let document = command
            .document
            .map(Document::new)
            .transpose()
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;

        customer.update_info(command.name, email, document, command.phone);

        self.customer_repo.save(&customer).await?;
        self.publish(customer.take_events()).await;

        Ok(customer)
    }

    async fn delete_customer(&self, id: &EntityId) -> Result<(), UseCaseError> {
        let customer = self
            .customer_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("customer not found".into()))?;

        self.customer_repo.delete(customer.id()).await?;
        self.publish(vec![DomainEvent::Customer(CustomerEvent::Deleted {
            customer_id: customer.id().clone(),
        })])
        .await;

        Ok(())
    }
}
