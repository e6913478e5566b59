//! Role-based authorisation rules and the force-password-reset gate.

use serde_json::json;

use super::{Error, Role, UserAccount, UserId};

/// Identity of the caller behind a verified bearer token.
///
/// Reloaded from storage on every request so role changes and resets take
/// effect immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub force_password_reset: bool,
}

impl From<&UserAccount> for AuthenticatedUser {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            email: account.email.to_string(),
            role: account.role,
            force_password_reset: account.force_password_reset,
        }
    }
}

/// Fail with `403` unless the caller holds one of `allowed`.
pub fn require_role(user: &AuthenticatedUser, allowed: &[Role]) -> Result<(), Error> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(Error::forbidden("Insufficient permissions"))
    }
}

/// Fail with `403` unless the caller may review submissions and accounts.
pub fn require_reviewer(user: &AuthenticatedUser) -> Result<(), Error> {
    require_role(user, &[Role::Admin, Role::Ceo])
}

/// Force-password-reset gate.
///
/// Accounts created or reset by a reviewer carry a temporary password and are
/// blocked from everything except the password-change endpoints until they
/// choose their own.
pub fn ensure_password_current(user: &AuthenticatedUser) -> Result<(), Error> {
    if user.force_password_reset {
        Err(Error::forbidden("Password reset required").with_details(json!({ "forceReset": true })))
    } else {
        Ok(())
    }
}

/// Which accounts a reviewer may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersScope {
    /// Every account.
    All,
    /// Field staff, the admin themself, and accounts the admin created.
    ManagedBy(UserId),
}

impl UsersScope {
    /// Scope visible to `actor`.
    pub fn for_actor(actor: &AuthenticatedUser) -> Result<Self, Error> {
        match actor.role {
            Role::Ceo => Ok(Self::All),
            Role::Admin => Ok(Self::ManagedBy(actor.id)),
            Role::User => Err(Error::forbidden("Insufficient permissions")),
        }
    }
}

/// Whether `actor` may create an account with `role`.
pub fn ensure_can_create(actor: &AuthenticatedUser, role: Role) -> Result<(), Error> {
    require_reviewer(actor)?;
    match (actor.role, role) {
        (_, Role::Ceo) => Err(Error::invalid_request("Role must be user or admin")),
        (Role::Ceo, _) | (_, Role::User) => Ok(()),
        _ => Err(Error::forbidden("Only CEO can create admin accounts")),
    }
}

/// Whether `actor` may issue a temporary password to `target`.
pub fn ensure_can_reset_password(
    actor: &AuthenticatedUser,
    target: &UserAccount,
) -> Result<(), Error> {
    require_reviewer(actor)?;
    if actor.role == Role::Ceo || target.id == actor.id {
        return Ok(());
    }
    if target.role == Role::Admin {
        return Err(Error::forbidden("Cannot reset another admin's password"));
    }
    if target.created_by == Some(actor.id) || target.role == Role::User {
        Ok(())
    } else {
        Err(Error::forbidden("Cannot reset password for this user"))
    }
}

/// Whether `actor` may change the role of `target`.
pub fn ensure_can_change_role(actor: &AuthenticatedUser, target: &UserAccount) -> Result<(), Error> {
    require_role(actor, &[Role::Ceo])?;
    if target.role == Role::Ceo {
        return Err(Error::forbidden("Cannot change CEO role"));
    }
    Ok(())
}

/// Whether `actor` may delete `target`.
pub fn ensure_can_delete(actor: &AuthenticatedUser, target: &UserAccount) -> Result<(), Error> {
    require_role(actor, &[Role::Ceo])?;
    if target.role == Role::Ceo {
        return Err(Error::forbidden("Cannot delete CEO account"));
    }
    Ok(())
}
