//! User Aggregate
//!
//! Operator accounts with role-based permissions. Password hashing and token
//! issuance belong to the authentication layer; this aggregate only stores
//! the resulting hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::{Email, EntityId};

/// Built-in role names
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Admin,
    User,
    Visitor,
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
            Self::Visitor => write!(f, "visitor"),
        }
    }
}

/// Named capability grantable through roles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permission {
    id: EntityId,
    name: String,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Role: a named permission set
#[derive(Clone, Debug)]
pub struct Role {
    id: EntityId,
    name: RoleName,
    permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: RoleName, permissions: Vec<Permission>) -> Self {
        Self {
            id: EntityId::new(),
            name,
            permissions,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }
    pub fn name(&self) -> RoleName {
        self.name
    }
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Replace the permission set (used when re-syncing defaults)
    pub fn set_permissions(&mut self, permissions: Vec<Permission>) {
        self.permissions = permissions;
    }

    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.name() == permission)
    }
}

/// User aggregate root
#[derive(Clone, Debug)]
pub struct User {
    id: EntityId,
    name: String,
    email: Email,
    password_hash: String,
    roles: Vec<Role>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (factory method)
    pub fn create(
        name: impl Into<String>,
        email: Email,
        password_hash: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(),
            name: name.into(),
            email,
            password_hash: password_hash.into(),
            roles,
            created_at: now,
            updated_at: now,
        }
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
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Patch account fields; only supplied values are applied
    pub fn update_info(&mut self, name: Option<String>, email: Option<Email>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        self.touch();
    }

    pub fn set_roles(&mut self, roles: Vec<Role>) {
        self.roles = roles;
        self.touch();
    }

    /// Whether any of the user's roles grants the permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.roles.iter().any(|r| r.grants(permission))
    }

    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.iter().any(|r| r.name() == role)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
