//! Customer Aggregate
//!
//! Identity record owning charges. Email and document are unique across the
//! store; uniqueness is enforced by the application services against the
//! repository, not here.

use chrono::{DateTime, Utc};

use crate::domain::events::{CustomerEvent, DomainEvent};
use crate::domain::value_objects::{Document, Email, EntityId};

/// Customer aggregate root
#[derive(Clone, Debug)]
pub struct Customer {
    id: EntityId,
    name: String,
    email: Email,
    document: Document,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Customer {
    /// Create a new customer (factory method)
    pub fn create(
        name: impl Into<String>,
        email: Email,
        document: Document,
        phone: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let id = EntityId::new();

        let mut customer = Self {
            id: id.clone(),
            name: name.into(),
            email: email.clone(),
            document,
            phone: phone.into(),
            created_at: now,
            updated_at: now,
            events: vec![],
        };

        customer.raise_event(DomainEvent::Customer(CustomerEvent::Created {
            customer_id: id,
            email,
            created_at: now,
        }));

        customer
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &Email {
        &self.email
    }
    pub fn document(&self) -> &Document {
        &self.document
    }
    pub fn phone(&self) -> &str {
        &self.phone
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Patch identity fields; only supplied values are applied
    pub fn update_info(
        &mut self,
        name: Option<String>,
        email: Option<Email>,
        document: Option<Document>,
        phone: Option<String>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(document) = document {
            self.document = document;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        self.touch();

        self.raise_event(DomainEvent::Customer(CustomerEvent::Updated {
            customer_id: self.id.clone(),
            updated_at: self.updated_at,
        }));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_customer() -> Customer {
        Customer::create(
            "Maria Silva",
            Email::new("maria@example.com").unwrap(),
            Document::new("12345678901").unwrap(),
            "+55 11 99999-0000",
        )
    }

    #[test]
    fn test_customer_creation() {
        let customer = create_test_customer();
        assert_eq!(customer.name(), "Maria Silva");
        assert_eq!(customer.email().as_str(), "maria@example.com");
        assert_eq!(customer.document().as_str(), "12345678901");
    }

    #[test]
    fn test_customer_created_event() {
        let mut customer = create_test_customer();
        let events = customer.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            DomainEvent::Customer(CustomerEvent::Created { .. })
        ));
    }

    #[test]
    fn test_update_info_patches_only_supplied_fields() {
        let mut customer = create_test_customer();
        customer.take_events();

        customer.update_info(Some("Maria Souza".into()), None, None, None);

        assert_eq!(customer.name(), "Maria Souza");
        assert_eq!(customer.email().as_str(), "maria@example.com");

        let events = customer.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            DomainEvent::Customer(CustomerEvent::Updated { .. })
        ));
    }
}
