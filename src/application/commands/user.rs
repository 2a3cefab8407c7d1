//! User application service
//!
//! Account CRUD plus the idempotent seeding of default roles and
//! permissions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dto::{CreateUserCommand, UpdateUserCommand};
use crate::domain::aggregates::{Permission, Role, RoleName, User};
use crate::domain::value_objects::{Email, EntityId};
use crate::ports::inbound::{UseCaseError, UserUseCases};
use crate::ports::outbound::{PermissionRepository, RoleRepository, UserRepository};

/// Names of every seeded permission
pub const DEFAULT_PERMISSIONS: &[&str] = &[
    "customer_read",
    "customer_create",
    "customer_update",
    "customer_delete",
    "charge_read",
    "charge_create",
    "charge_update",
    "webhook_read",
    "webhook_manage",
    "metrics_read",
];

/// User application service
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    role_repo: Arc<dyn RoleRepository>,
    permission_repo: Arc<dyn PermissionRepository>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        role_repo: Arc<dyn RoleRepository>,
        permission_repo: Arc<dyn PermissionRepository>,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            permission_repo,
        }
    }

    async fn resolve_roles(&self, names: &[RoleName]) -> Result<Vec<Role>, UseCaseError> {
        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            let role = self
                .role_repo
                .find_by_name(*name)
                .await?
                .ok_or_else(|| UseCaseError::NotFound(format!("role {name} not found")))?;
            roles.push(role);
        }
        Ok(roles)
    }

    /// Permission subset granted to each built-in role
    fn permissions_for_role(name: RoleName, all: &[Permission]) -> Vec<Permission> {
        match name {
            RoleName::Admin => all.to_vec(),
            RoleName::User => all
                .iter()
                .filter(|p| {
                    matches!(p.name(), "customer_read" | "charge_read" | "webhook_read")
                })
                .cloned()
                .collect(),
            RoleName::Visitor => all
                .iter()
                .filter(|p| p.name() == "charge_read")
                .cloned()
                .collect(),
        }
    }
}

#[async_trait]
impl UserUseCases for UserService {
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UseCaseError> {
        let email = Email::new(&command.email)
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(UseCaseError::Conflict(
                "a user with this email already exists".into(),
            ));
        }

        let role_names = command.roles.unwrap_or_else(|| vec![RoleName::User]);
        let roles = self.resolve_roles(&role_names).await?;

        let user = User::create(command.name, email, command.password_hash, roles);
        self.user_repo.save(&user).await?;

        tracing::debug!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn find_all_users(&self) -> Result<Vec<User>, UseCaseError> {
        Ok(self.user_repo.find_all().await?)
    }

    async fn find_user_by_id(&self, id: &EntityId) -> Result<User, UseCaseError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("user not found".into()))
    }

    async fn update_user(
        &self,
        id: &EntityId,
        command: UpdateUserCommand,
    ) -> Result<User, UseCaseError> {
        let mut user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("user not found".into()))?;

        let email = command
            .email
            .map(Email::new)
            .transpose()
            .map_err(|e| UseCaseError::InvalidArgument(e.to_string()))?;
        user.update_info(command.name, email);

        if let Some(role_names) = command.roles {
            let roles = self.resolve_roles(&role_names).await?;
            user.set_roles(roles);
        }

        self.user_repo.save(&user).await?;
        Ok(user)
    }

    async fn delete_user(&self, id: &EntityId) -> Result<(), UseCaseError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("user not found".into()))?;

        self.user_repo.delete(id).await?;
        Ok(())
    }

    async fn init_defaults(&self) -> Result<(), UseCaseError> {
        tracing::info!("seeding default roles and permissions");

        let mut saved = Vec::with_capacity(DEFAULT_PERMISSIONS.len());
        for name in DEFAULT_PERMISSIONS {
            let permission = match self.permission_repo.find_by_name(name).await? {
                Some(existing) => existing,
                None => {
                    let permission = Permission::new(*name);
                    self.permission_repo.save(&permission).await?;
                    tracing::debug!(permission = name, "permission created");
                    permission
                }
            };
            saved.push(permission);
        }

        for name in [RoleName::Admin, RoleName::User, RoleName::Visitor] {
            let permissions = Self::permissions_for_role(name, &saved);
            match self.role_repo.find_by_name(name).await? {
                Some(mut role) => {
                    role.set_permissions(permissions);
                    self.role_repo.save(&role).await?;
                    tracing::debug!(role = %name, "role permissions re-synced");
                }
                None => {
                    let role = Role::new(name, permissions);
                    self.role_repo.save(&role).await?;
                    tracing::debug!(role = %name, "role created");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{
        InMemoryPermissionRepository, InMemoryRoleRepository, InMemoryUserRepository,
    };

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRoleRepository::new()),
            Arc::new(InMemoryPermissionRepository::new()),
        )
    }

    fn command(email: &str) -> CreateUserCommand {
        CreateUserCommand {
            name: "Ana".into(),
            email: email.into(),
            password_hash: "$2b$10$hash".into(),
            roles: None,
        }
    }

    #[tokio::test]
    async fn test_init_defaults_seeds_roles_and_permissions() {
        let service = service();
        service.init_defaults().await.unwrap();

        let admin = service
            .role_repo
            .find_by_name(RoleName::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.permissions().len(), DEFAULT_PERMISSIONS.len());

        let visitor = service
            .role_repo
            .find_by_name(RoleName::Visitor)
            .await
            .unwrap()
            .unwrap();
        assert!(visitor.grants("charge_read"));
        assert!(!visitor.grants("charge_create"));
    }

    #[tokio::test]
    async fn test_init_defaults_is_idempotent() {
        let service = service();
        service.init_defaults().await.unwrap();
        service.init_defaults().await.unwrap();

        let permissions = service.permission_repo.find_all().await.unwrap();
        assert_eq!(permissions.len(), DEFAULT_PERMISSIONS.len());

        let roles = service.role_repo.find_all().await.unwrap();
        assert_eq!(roles.len(), 3);
    }

    #[tokio::test]
    async fn test_create_user_defaults_to_user_role() {
        let service = service();
        service.init_defaults().await.unwrap();

        let user = service.create_user(command("ana@example.com")).await.unwrap();
        assert!(user.has_role(RoleName::User));
        assert!(user.has_permission("charge_read"));
        assert!(!user.has_permission("charge_create"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_conflict() {
        let service = service();
        service.init_defaults().await.unwrap();

        service.create_user(command("ana@example.com")).await.unwrap();
        let err = service
            .create_user(command("ana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_user_roles() {
        let service = service();
        service.init_defaults().await.unwrap();

        let user = service.create_user(command("ana@example.com")).await.unwrap();
        let updated = service
            .update_user(
                user.id(),
                UpdateUserCommand {
                    roles: Some(vec![RoleName::Admin]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.has_role(RoleName::Admin));
        assert!(updated.has_permission("customer_delete"));
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let service = service();
        let err = service.delete_user(&EntityId::new()).await.unwrap_err();
        assert!(matches!(err, UseCaseError::NotFound(_)));
    }
}
