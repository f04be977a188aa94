use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{Account, AccountPatch, ChangePasswordInput, CreateAccountInput, NewAccount, UpdateAccountInput};
use super::repository::AccountRepository;
use crate::auth::domain::Principal;
use crate::auth::password::{hash_password, validate_password, PASSWORD_ALGORITHM};
use crate::auth::rbac::{parse_roles, Operation, Role};
use crate::department::repository::DepartmentRepository;
use crate::errors::ServiceError;

/// Account management: creation, edits, status, passwords and deletion.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    departments: Arc<dyn DepartmentRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, departments: Arc<dyn DepartmentRepository>) -> Self {
        Self { accounts, departments }
    }

    #[instrument(skip(self, input), fields(phone = %input.phone))]
    pub async fn create(&self, input: CreateAccountInput) -> Result<Account, ServiceError> {
        let phone = input.phone.trim().to_string();
        models::account::validate_phone(&phone)?;
        models::account::validate_name(&input.name)?;
        validate_password(&input.password)?;
        let roles = parse_roles(&input.roles).map_err(|e| ServiceError::Validation(e.to_string()))?;
        self.ensure_departments(&input.department_ids).await?;
        if self.accounts.find_by_phone(&phone).await?.is_some() {
            return Err(ServiceError::Conflict("phone already registered".into()));
        }

        let account = self
            .accounts
            .create(NewAccount {
                phone,
                name: input.name.trim().to_string(),
                roles,
                department_ids: dedup(input.department_ids),
                password_hash: hash_password(&input.password)?,
                password_algorithm: PASSWORD_ALGORITHM.to_string(),
            })
            .await?;
        info!(account_id = %account.id, "account_created");
        Ok(account)
    }

    pub async fn list(&self) -> Result<Vec<Account>, ServiceError> { self.accounts.list().await }

    pub async fn get(&self, id: Uuid) -> Result<Account, ServiceError> {
        self.accounts.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("account"))
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateAccountInput) -> Result<Account, ServiceError> {
        self.get(id).await?;
        let mut patch = AccountPatch::default();
        if let Some(phone) = input.phone {
            let phone = phone.trim().to_string();
            models::account::validate_phone(&phone)?;
            if let Some(other) = self.accounts.find_by_phone(&phone).await? {
                if other.id != id {
                    return Err(ServiceError::Conflict("phone already registered".into()));
                }
            }
            patch.phone = Some(phone);
        }
        if let Some(name) = input.name {
            models::account::validate_name(&name)?;
            patch.name = Some(name.trim().to_string());
        }
        if let Some(raw) = input.roles {
            patch.roles = Some(parse_roles(&raw).map_err(|e| ServiceError::Validation(e.to_string()))?);
        }
        if let Some(ids) = input.department_ids {
            self.ensure_departments(&ids).await?;
            patch.department_ids = Some(dedup(ids));
        }
        if let Some(password) = &input.password {
            validate_password(password)?;
        }

        let mut account = self.accounts.update(id, patch).await?;
        if let Some(password) = input.password {
            self.accounts.set_password(id, hash_password(&password)?, PASSWORD_ALGORITHM).await?;
            account = self.get(id).await?;
        }
        info!(account_id = %id, "account_updated");
        Ok(account)
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: Uuid, active: bool) -> Result<Account, ServiceError> {
        self.get(id).await?;
        self.accounts.set_active(&[id], active).await?;
        info!(account_id = %id, active, "account_status_changed");
        self.get(id).await
    }

    /// All ids must exist; nothing changes otherwise.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn batch_set_status(&self, ids: &[Uuid], active: bool) -> Result<u64, ServiceError> {
        let ids = self.ensure_accounts(ids).await?;
        let n = self.accounts.set_active(&ids, active).await?;
        info!(count = n, active, "account_status_batch_changed");
        Ok(n)
    }

    /// Change a password. Callers may change their own; changing someone
    /// else's needs account management.
    #[instrument(skip(self, actor, input), fields(actor = %actor.id()))]
    pub async fn change_password(&self, actor: &Principal, input: ChangePasswordInput) -> Result<(), ServiceError> {
        let target = input.account_id.unwrap_or(actor.id());
        if target != actor.id() && !actor.allows(Operation::AccountManage) {
            return Err(ServiceError::Forbidden("can only change your own password".into()));
        }
        self.reset_password(target, &input.new_password).await
    }

    pub async fn reset_password(&self, id: Uuid, password: &str) -> Result<(), ServiceError> {
        validate_password(password)?;
        self.get(id).await?;
        self.accounts.set_password(id, hash_password(password)?, PASSWORD_ALGORITHM).await?;
        info!(account_id = %id, "password_changed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        if actor_id == id {
            return Err(ServiceError::Validation("cannot delete your own account".into()));
        }
        self.get(id).await?;
        self.accounts.delete(&[id]).await?;
        info!(account_id = %id, "account_deleted");
        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn batch_delete(&self, actor_id: Uuid, ids: &[Uuid]) -> Result<u64, ServiceError> {
        if ids.contains(&actor_id) {
            return Err(ServiceError::Validation("cannot delete your own account".into()));
        }
        let ids = self.ensure_accounts(ids).await?;
        let n = self.accounts.delete(&ids).await?;
        info!(count = n, "account_batch_deleted");
        Ok(n)
    }

    /// Create the bootstrap admin unless an account already owns the phone.
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(&self, phone: &str, password: &str) -> Result<bool, ServiceError> {
        if self.accounts.find_by_phone(phone.trim()).await?.is_some() {
            return Ok(false);
        }
        self.create(CreateAccountInput {
            phone: phone.to_string(),
            password: password.to_string(),
            name: "管理员".to_string(),
            department_ids: vec![],
            roles: vec![Role::Admin.code().to_string()],
        })
        .await?;
        Ok(true)
    }

    async fn ensure_accounts(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError> {
        let ids = dedup(ids.to_vec());
        if ids.is_empty() {
            return Err(ServiceError::Validation("ids must not be empty".into()));
        }
        if self.accounts.existing_ids(&ids).await?.len() != ids.len() {
            return Err(ServiceError::Validation("some accounts do not exist".into()));
        }
        Ok(ids)
    }

    async fn ensure_departments(&self, ids: &[Uuid]) -> Result<(), ServiceError> {
        let ids = dedup(ids.to_vec());
        if ids.is_empty() {
            return Ok(());
        }
        if self.departments.existing_department_ids(&ids).await?.len() != ids.len() {
            return Err(ServiceError::Validation("some departments do not exist".into()));
        }
        Ok(())
    }
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
    ids
}
