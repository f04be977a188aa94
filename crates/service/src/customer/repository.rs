use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Customer, CustomerInput, CustomerPatch, CustomerQuery};
use crate::errors::ServiceError;

/// Repository abstraction for customer persistence.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>, ServiceError>;
    /// One page, newest first, plus the total number of matches.
    async fn search_customers(&self, query: &CustomerQuery) -> Result<(u64, Vec<Customer>), ServiceError>;
    async fn create_customer(&self, input: CustomerInput) -> Result<Customer, ServiceError>;
    async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, ServiceError>;
    async fn delete_customer(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn count_by_department(&self, department_id: Uuid) -> Result<u64, ServiceError>;
}
