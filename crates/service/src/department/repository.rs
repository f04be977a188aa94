use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Department, DepartmentPatch};
use crate::errors::ServiceError;

/// Repository abstraction for department persistence.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, ServiceError>;
    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, ServiceError>;
    /// Newest first.
    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError>;
    async fn existing_department_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError>;
    async fn create_department(&self, name: &str, owner_id: Option<Uuid>) -> Result<Department, ServiceError>;
    async fn update_department(&self, id: Uuid, patch: DepartmentPatch) -> Result<Department, ServiceError>;
    /// Memberships are removed with the department.
    async fn delete_department(&self, id: Uuid) -> Result<bool, ServiceError>;
}
