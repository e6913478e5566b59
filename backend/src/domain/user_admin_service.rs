//! Account administration for reviewers.
//!
//! Authorisation decisions live in [`crate::domain::access`]; this service
//! loads the accounts involved, applies those rules, and persists the result.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::access::{
    ensure_can_change_role, ensure_can_create, ensure_can_delete, ensure_can_reset_password,
};
use crate::domain::audit::record_quietly;
use crate::domain::ports::{
    AuditLog, NewAccount, PasswordHasher, RefreshTokenRepository, UserPersistenceError,
    UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    AuditAction, AuditEntry, AuthenticatedUser, Error, Role, TemporaryPassword, UserAccount,
    UserId, UserIdentity, UserSummary, UsersScope, require_reviewer, require_role,
};

/// Service implementing the account listing and management ports.
#[derive(Clone)]
pub struct UserAdminService<U, R, A> {
    users: Arc<U>,
    refresh_tokens: Arc<R>,
    audit: Arc<A>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl<U, R, A> UserAdminService<U, R, A> {
    /// Create a new service with its repositories and collaborators.
    pub fn new(
        users: Arc<U>,
        refresh_tokens: Arc<R>,
        audit: Arc<A>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            audit,
            hasher,
            clock,
        }
    }
}

impl<U, R, A> UserAdminService<U, R, A>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    A: AuditLog,
{
    async fn load_target(&self, id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn audit(&self, action: AuditAction, actor: &AuthenticatedUser, meta: serde_json::Value) {
        record_quietly(self.audit.as_ref(), AuditEntry::new(action, actor.id, meta)).await;
    }
}

#[async_trait]
impl<U, R, A> UsersQuery for UserAdminService<U, R, A>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    A: AuditLog,
{
    async fn list_users(&self, actor: &AuthenticatedUser) -> Result<Vec<UserSummary>, Error> {
        let scope = UsersScope::for_actor(actor)?;
        Ok(self.users.list(scope).await?)
    }
}

#[async_trait]
impl<U, R, A> UsersCommand for UserAdminService<U, R, A>
where
    U: UserRepository,
    R: RefreshTokenRepository,
    A: AuditLog,
{
    async fn create_user(
        &self,
        actor: &AuthenticatedUser,
        account: NewAccount,
    ) -> Result<UserIdentity, Error> {
        ensure_can_create(actor, account.role)?;
        let password_hash = self
            .hasher
            .hash(account.temporary_password.expose())
            .await?;
        let created = UserAccount {
            id: UserId::random(),
            email: account.email,
            role: account.role,
            password_hash,
            force_password_reset: true,
            created_by: Some(actor.id),
            last_login: None,
            created_at: self.clock.utc(),
        };

        match self.users.insert(&created).await {
            Ok(()) => {}
            Err(UserPersistenceError::DuplicateEmail { .. }) => {
                return Err(Error::invalid_request("Email already exists"));
            }
            Err(other) => return Err(other.into()),
        }

        self.audit(
            AuditAction::UserCreated,
            actor,
            json!({
                "newUserId": created.id,
                "email": created.email,
                "role": created.role,
            }),
        )
        .await;
        info!(user_id = %created.id, role = created.role.as_str(), "account created");
        Ok(created.identity())
    }

    async fn reset_password(
        &self,
        actor: &AuthenticatedUser,
        target: &UserId,
        password: TemporaryPassword,
    ) -> Result<(), Error> {
        require_reviewer(actor)?;
        let account = self.load_target(target).await?;
        ensure_can_reset_password(actor, &account)?;

        let password_hash = self.hasher.hash(password.expose()).await?;
        self.users
            .update_password(&account.id, &password_hash, true)
            .await?;
        self.refresh_tokens.revoke_all_for_user(&account.id).await?;

        self.audit(
            AuditAction::PasswordResetByAdmin,
            actor,
            json!({ "targetUserId": account.id }),
        )
        .await;
        Ok(())
    }

    async fn change_role(
        &self,
        actor: &AuthenticatedUser,
        target: &UserId,
        role: Role,
    ) -> Result<(), Error> {
        require_role(actor, &[Role::Ceo])?;
        if role == Role::Ceo {
            return Err(Error::invalid_request("Role must be user or admin"));
        }
        let account = self.load_target(target).await?;
        ensure_can_change_role(actor, &account)?;

        self.users.update_role(&account.id, role).await?;
        self.audit(
            AuditAction::RoleChanged,
            actor,
            json!({
                "targetUserId": account.id,
                "oldRole": account.role,
                "newRole": role,
            }),
        )
        .await;
        Ok(())
    }

    async fn delete_user(&self, actor: &AuthenticatedUser, target: &UserId) -> Result<(), Error> {
        require_role(actor, &[Role::Ceo])?;
        let account = self.load_target(target).await?;
        ensure_can_delete(actor, &account)?;

        if !self.users.delete(&account.id).await? {
            return Err(Error::not_found("User not found"));
        }
        self.audit(
            AuditAction::UserDeleted,
            actor,
            json!({ "deletedUserId": account.id, "email": account.email }),
        )
        .await;
        info!(user_id = %account.id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_admin_service_tests.rs"]
mod tests;
