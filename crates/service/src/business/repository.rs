use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{BusinessConfig, BusinessParameter};
use crate::errors::ServiceError;

pub const CONFIG_ALREADY_INITIALIZED: &str = "business config already initialized; update it instead";

/// Unique-key violation on the config insert (two concurrent initializes) reads
/// as the same validation failure as the up-front check.
pub(crate) fn config_exists(e: ServiceError) -> ServiceError {
    match e {
        ServiceError::Conflict(_) => ServiceError::Validation(CONFIG_ALREADY_INITIALIZED.into()),
        other => other,
    }
}

/// Repository abstraction for parameters and per-account configs.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn get_parameter(&self, key: &str) -> Result<Option<BusinessParameter>, ServiceError>;
    /// Ordered by key.
    async fn list_parameters(&self) -> Result<Vec<BusinessParameter>, ServiceError>;
    async fn upsert_parameter(&self, key: &str, value: &str, description: Option<String>) -> Result<BusinessParameter, ServiceError>;
    async fn delete_parameter(&self, key: &str) -> Result<bool, ServiceError>;

    async fn find_config(&self, account_id: Uuid) -> Result<Option<BusinessConfig>, ServiceError>;
    /// Fails with `Validation` when the account already has one.
    async fn insert_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<BusinessConfig, ServiceError>;
    async fn update_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<Option<BusinessConfig>, ServiceError>;
}
