use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::department;

use crate::department::domain::{Department, DepartmentPatch};
use crate::department::repository::DepartmentRepository;
use crate::errors::ServiceError;

pub struct SeaOrmDepartmentRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: department::Model) -> Department {
    Department {
        id: m.id,
        name: m.name,
        owner_id: m.owner_id,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

#[async_trait::async_trait]
impl DepartmentRepository for SeaOrmDepartmentRepository {
    async fn find_department(&self, id: Uuid) -> Result<Option<Department>, ServiceError> {
        Ok(department::Entity::find_by_id(id).one(&self.db).await?.map(to_domain))
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>, ServiceError> {
        let res = department::Entity::find()
            .filter(department::Column::Name.eq(name.to_string()))
            .one(&self.db)
            .await?;
        Ok(res.map(to_domain))
    }

    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        let rows = department::Entity::find()
            .order_by_desc(department::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn existing_department_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, ServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = department::Entity::find()
            .filter(department::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| m.id).collect())
    }

    async fn create_department(&self, name: &str, owner_id: Option<Uuid>) -> Result<Department, ServiceError> {
        let now = Utc::now().into();
        let am = department::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            owner_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(to_domain(am.insert(&self.db).await?))
    }

    async fn update_department(&self, id: Uuid, patch: DepartmentPatch) -> Result<Department, ServiceError> {
        let existing = department::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("department"))?;
        let mut am: department::ActiveModel = existing.into();
        if let Some(name) = patch.name { am.name = Set(name); }
        if let Some(owner) = patch.owner_id { am.owner_id = Set(owner); }
        am.updated_at = Set(Utc::now().into());
        Ok(to_domain(am.update(&self.db).await?))
    }

    async fn delete_department(&self, id: Uuid) -> Result<bool, ServiceError> {
        // 客户外键为 RESTRICT：仍有客户时数据库拒绝删除（映射为 409）
        let res = department::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
