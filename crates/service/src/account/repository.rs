use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Account, AccountPatch, Credentials, NewAccount};
use crate::errors::ServiceError;

/// Repository abstraction for account persistence.
///
/// Every write that changes phone, roles, password or status increments the
/// account's token version in the same statement.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ServiceError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, ServiceError>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<Account>, ServiceError>;
    /// Ids from `ids` that exist.
    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError>;

    /// Insert account, credentials and memberships atomically.
    async fn create(&self, input: NewAccount) -> Result<Account, ServiceError>;
    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<Account, ServiceError>;
    /// Returns the number of accounts changed.
    async fn set_active(&self, ids: &[Uuid], active: bool) -> Result<u64, ServiceError>;
    /// Returns the number of accounts deleted. Memberships, credentials and
    /// business config go with them.
    async fn delete(&self, ids: &[Uuid]) -> Result<u64, ServiceError>;

    async fn get_credentials(&self, id: Uuid) -> Result<Option<Credentials>, ServiceError>;
    async fn set_password(&self, id: Uuid, password_hash: String, password_algorithm: &str) -> Result<(), ServiceError>;
}
