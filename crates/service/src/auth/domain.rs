use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;
use super::rbac::{Operation, PermissionSet, Role};
use crate::account::domain::Account;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub phone: String,
    pub password: String,
}

/// Refresh input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Whether the account has initialized its business config.
    pub has_initialized: bool,
    /// Role codes of the account.
    pub permissions: Vec<Role>,
}

/// Authenticated caller attached to a request by the gate.
#[derive(Debug, Clone)]
pub struct Principal {
    pub account: Account,
    pub permissions: PermissionSet,
}

impl Principal {
    pub fn new(account: Account) -> Self {
        let permissions = PermissionSet::from_roles(&account.roles);
        Self { account, permissions }
    }

    pub fn id(&self) -> Uuid { self.account.id }

    pub fn allows(&self, op: Operation) -> bool { self.permissions.allows(op) }

    /// Reject the request unless the caller may perform `op`.
    pub fn require(&self, op: Operation) -> Result<(), AuthError> { self.permissions.check(op) }
}
