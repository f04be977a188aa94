use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{BusinessConfig, BusinessParameter, ParameterInput};
use super::repository::{BusinessRepository, CONFIG_ALREADY_INITIALIZED};
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct BusinessService {
    repo: Arc<dyn BusinessRepository>,
}

impl BusinessService {
    pub fn new(repo: Arc<dyn BusinessRepository>) -> Self { Self { repo } }

    pub async fn list_parameters(&self) -> Result<Vec<BusinessParameter>, ServiceError> {
        self.repo.list_parameters().await
    }

    pub async fn get_parameter(&self, key: &str) -> Result<BusinessParameter, ServiceError> {
        self.repo.get_parameter(key).await?.ok_or_else(|| ServiceError::not_found("parameter"))
    }

    #[instrument(skip(self, input))]
    pub async fn set_parameter(&self, key: &str, input: ParameterInput) -> Result<BusinessParameter, ServiceError> {
        models::business_parameter::validate_key(key)?;
        if let Some(d) = &input.description {
            models::business_parameter::validate_description(d)?;
        }
        let param = self.repo.upsert_parameter(key, &input.value, input.description).await?;
        info!(key, "parameter_set");
        Ok(param)
    }

    #[instrument(skip(self))]
    pub async fn delete_parameter(&self, key: &str) -> Result<(), ServiceError> {
        if !self.repo.delete_parameter(key).await? {
            return Err(ServiceError::not_found("parameter"));
        }
        info!(key, "parameter_deleted");
        Ok(())
    }

    /// First-time setup; a second call is rejected.
    #[instrument(skip(self, data))]
    pub async fn initialize_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<BusinessConfig, ServiceError> {
        check_document(&data)?;
        if self.repo.find_config(account_id).await?.is_some() {
            return Err(ServiceError::Validation(CONFIG_ALREADY_INITIALIZED.into()));
        }
        let cfg = self.repo.insert_config(account_id, data).await?;
        info!(account_id = %account_id, "business_config_initialized");
        Ok(cfg)
    }

    pub async fn current_config(&self, account_id: Uuid) -> Result<BusinessConfig, ServiceError> {
        self.repo
            .find_config(account_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("business config not initialized".into()))
    }

    #[instrument(skip(self, data))]
    pub async fn update_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<BusinessConfig, ServiceError> {
        check_document(&data)?;
        let cfg = self
            .repo
            .update_config(account_id, data)
            .await?
            .ok_or_else(|| ServiceError::NotFound("business config not initialized".into()))?;
        info!(account_id = %account_id, "business_config_updated");
        Ok(cfg)
    }
}

fn check_document(data: &serde_json::Value) -> Result<(), ServiceError> {
    if !data.is_object() {
        return Err(ServiceError::Validation("config_data must be a JSON object".into()));
    }
    Ok(())
}
