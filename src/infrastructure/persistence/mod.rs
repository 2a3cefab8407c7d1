//! In-memory repository implementations
//!
//! Process-local adapters for the outbound persistence ports. They back the
//! test suites and any deployment that does not need a durable store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::aggregates::{
    Charge, ChargeStatus, Customer, PaymentMethod, Permission, Role, RoleName, User, Webhook,
    WebhookEvent, WebhookStatus,
};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{Document, Email, EntityId};
use crate::ports::outbound::{
    ChargeRepository, CustomerRepository, EventPublisher, PermissionRepository, RepositoryError,
    RoleRepository, UserRepository, WebhookRepository,
};

/// In-memory customer repository
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<String, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.customers.read().get(id.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .customers
            .read()
            .values()
            .find(|c| c.email() == email)
            .cloned())
    }

    async fn find_by_document(
        &self,
        document: &Document,
    ) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .customers
            .read()
            .values()
            .find(|c| c.document() == document)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self.customers.read().values().cloned().collect())
    }

    async fn save(&self, customer: &Customer) -> Result<(), RepositoryError> {
        self.customers
            .write()
            .insert(customer.id().to_string(), customer.clone());
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.customers.write().remove(id.as_str());
        Ok(())
    }
}

/// In-memory charge repository
#[derive(Default)]
pub struct InMemoryChargeRepository {
    charges: RwLock<HashMap<String, Charge>>,
}

impl InMemoryChargeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the matching charges, newest first
    fn collect_sorted<F>(&self, filter: F) -> Vec<Charge>
    where
        F: Fn(&Charge) -> bool,
    {
        let mut charges: Vec<Charge> = self
            .charges
            .read()
            .values()
            .filter(|c| filter(c))
            .cloned()
            .collect();
        charges.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        charges
    }
}

#[async_trait]
impl ChargeRepository for InMemoryChargeRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Charge>, RepositoryError> {
        Ok(self.charges.read().get(id.as_str()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Charge>, RepositoryError> {
        Ok(self.collect_sorted(|_| true))
    }

    async fn find_by_customer_id(
        &self,
        customer_id: &EntityId,
    ) -> Result<Vec<Charge>, RepositoryError> {
        Ok(self.collect_sorted(|c| c.customer_id() == customer_id))
    }

    async fn find_by_status(&self, status: ChargeStatus) -> Result<Vec<Charge>, RepositoryError> {
        Ok(self.collect_sorted(|c| c.status() == status))
    }

    async fn find_by_payment_method(
        &self,
        payment_method: PaymentMethod,
    ) -> Result<Vec<Charge>, RepositoryError> {
        Ok(self.collect_sorted(|c| c.payment_method() == payment_method))
    }

    async fn find_expired_charges(&self) -> Result<Vec<Charge>, RepositoryError> {
        let now = chrono::Utc::now();
        Ok(self.collect_sorted(|c| {
            c.status() == ChargeStatus::Pending
                && c.expires_at().map(|at| at < now).unwrap_or(false)
        }))
    }

    async fn find_pending_charges(&self) -> Result<Vec<Charge>, RepositoryError> {
        Ok(self.collect_sorted(|c| c.status() == ChargeStatus::Pending))
    }

    async fn save(&self, charge: &Charge) -> Result<(), RepositoryError> {
        self.charges
            .write()
            .insert(charge.id().to_string(), charge.clone());
        Ok(())
    }
}

/// In-memory webhook subscription repository
#[derive(Default)]
pub struct InMemoryWebhookRepository {
    webhooks: RwLock<HashMap<String, Webhook>>,
}

impl InMemoryWebhookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookRepository for InMemoryWebhookRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Webhook>, RepositoryError> {
        Ok(self.webhooks.read().get(id.as_str()).cloned())
    }

    async fn find_by_event(&self, event: WebhookEvent) -> Result<Vec<Webhook>, RepositoryError> {
        Ok(self
            .webhooks
            .read()
            .values()
            .filter(|w| w.subscribes_to(event))
            .cloned()
            .collect())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Webhook>, RepositoryError> {
        Ok(self
            .webhooks
            .read()
            .values()
            .find(|w| w.url() == url)
            .cloned())
    }

    async fn find_active(&self) -> Result<Vec<Webhook>, RepositoryError> {
        Ok(self
            .webhooks
            .read()
            .values()
            .filter(|w| w.status() != WebhookStatus::Disabled)
            .cloned()
            .collect())
    }

    async fn save(&self, webhook: &Webhook) -> Result<(), RepositoryError> {
        self.webhooks
            .write()
            .insert(webhook.id().to_string(), webhook.clone());
        Ok(())
    }
}

/// In-memory user repository
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().get(id.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.read().values().cloned().collect())
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.users
            .write()
            .insert(user.id().to_string(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), RepositoryError> {
        self.users.write().remove(id.as_str());
        Ok(())
    }
}

/// In-memory role repository
#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<String, Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_name(&self, name: RoleName) -> Result<Option<Role>, RepositoryError> {
        Ok(self
            .roles
            .read()
            .values()
            .find(|r| r.name() == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Role>, RepositoryError> {
        Ok(self.roles.read().values().cloned().collect())
    }

    async fn save(&self, role: &Role) -> Result<(), RepositoryError> {
        self.roles
            .write()
            .insert(role.id().to_string(), role.clone());
        Ok(())
    }
}

/// In-memory permission repository
#[derive(Default)]
pub struct InMemoryPermissionRepository {
    permissions: RwLock<HashMap<String, Permission>>,
}

impl InMemoryPermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Permission>, RepositoryError> {
        Ok(self
            .permissions
            .read()
            .values()
            .find(|p| p.name() == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Permission>, RepositoryError> {
        Ok(self.permissions.read().values().cloned().collect())
    }

    async fn save(&self, permission: &Permission) -> Result<(), RepositoryError> {
        self.permissions
            .write()
            .insert(permission.id().to_string(), permission.clone());
        Ok(())
    }
}

/// No-op event publisher for wiring tests without notifications
#[derive(Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn test_customer(email: &str, document: &str) -> Customer {
        Customer::create(
            "Maria Silva",
            Email::new(email).unwrap(),
            Document::new(document).unwrap(),
            "+55 11 99999-0000",
        )
    }

    #[tokio::test]
    async fn test_customer_repository_save_and_find() {
        let repo = InMemoryCustomerRepository::new();
        let customer = test_customer("maria@example.com", "12345678901");

        repo.save(&customer).await.unwrap();

        let found = repo.find_by_id(customer.id()).await.unwrap().unwrap();
        assert_eq!(found.email(), customer.email());

        let by_email = repo
            .find_by_email(&Email::new("maria@example.com").unwrap())
            .await
            .unwrap();
        assert!(by_email.is_some());

        let by_document = repo
            .find_by_document(&Document::new("12345678901").unwrap())
            .await
            .unwrap();
        assert!(by_document.is_some());
    }

    #[tokio::test]
    async fn test_customer_repository_delete() {
        let repo = InMemoryCustomerRepository::new();
        let customer = test_customer("maria@example.com", "12345678901");

        repo.save(&customer).await.unwrap();
        repo.delete(customer.id()).await.unwrap();

        assert!(repo.find_by_id(customer.id()).await.unwrap().is_none());
    }

    fn pending_charge(expires_at: Option<chrono::DateTime<Utc>>) -> Charge {
        Charge::create(
            EntityId::new(),
            Money::brl(Decimal::new(1000, 2)),
            PaymentMethod::Pix,
            None,
            None,
            expires_at,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_charge_repository_find_expired() {
        let repo = InMemoryChargeRepository::new();

        let overdue = pending_charge(Some(Utc::now() - Duration::minutes(5)));
        let fresh = pending_charge(None);
        repo.save(&overdue).await.unwrap();
        repo.save(&fresh).await.unwrap();

        let mut paid_overdue = pending_charge(Some(Utc::now() - Duration::minutes(5)));
        paid_overdue.transition_to(ChargeStatus::Paid, None).unwrap();
        repo.save(&paid_overdue).await.unwrap();

        let expired = repo.find_expired_charges().await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id(), overdue.id());
    }

    #[tokio::test]
    async fn test_charge_repository_orders_newest_first() {
        let repo = InMemoryChargeRepository::new();

        let first = pending_charge(None);
        repo.save(&first).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = pending_charge(None);
        repo.save(&second).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].id(), second.id());
        assert_eq!(all[1].id(), first.id());
    }

    #[tokio::test]
    async fn test_webhook_repository_find_by_event() {
        let repo = InMemoryWebhookRepository::new();

        let paid = Webhook::new(
            "https://a.example.com",
            vec![WebhookEvent::ChargePaid],
            "s1",
        );
        let created = Webhook::new(
            "https://b.example.com",
            vec![WebhookEvent::CustomerCreated],
            "s2",
        );
        repo.save(&paid).await.unwrap();
        repo.save(&created).await.unwrap();

        let matches = repo.find_by_event(WebhookEvent::ChargePaid).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id(), paid.id());
    }

    #[tokio::test]
    async fn test_webhook_repository_find_active_excludes_disabled() {
        let repo = InMemoryWebhookRepository::new();

        let mut disabled = Webhook::new(
            "https://a.example.com",
            vec![WebhookEvent::ChargePaid],
            "s1",
        );
        disabled.disable();
        let active = Webhook::new(
            "https://b.example.com",
            vec![WebhookEvent::ChargePaid],
            "s2",
        );
        repo.save(&disabled).await.unwrap();
        repo.save(&active).await.unwrap();

        let found = repo.find_active().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), active.id());
    }
}
