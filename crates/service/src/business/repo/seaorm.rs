use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::{business_config, business_parameter};

use crate::business::domain::{BusinessConfig, BusinessParameter};
use crate::business::repository::{config_exists, BusinessRepository};
use crate::errors::ServiceError;

pub struct SeaOrmBusinessRepository {
    pub db: DatabaseConnection,
}

fn parameter(m: business_parameter::Model) -> BusinessParameter {
    BusinessParameter { key: m.key, value: m.value, description: m.description, updated_at: m.updated_at.with_timezone(&Utc) }
}

fn config(m: business_config::Model) -> Result<BusinessConfig, ServiceError> {
    let data = serde_json::from_str(&m.config_data).map_err(|e| ServiceError::Db(format!("corrupt config_data: {e}")))?;
    Ok(BusinessConfig {
        id: m.id,
        account_id: m.account_id,
        config_data: data,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    })
}

async fn find_row(db: &DatabaseConnection, account_id: Uuid) -> Result<Option<business_config::Model>, ServiceError> {
    Ok(business_config::Entity::find()
        .filter(business_config::Column::AccountId.eq(account_id))
        .one(db)
        .await?)
}

#[async_trait::async_trait]
impl BusinessRepository for SeaOrmBusinessRepository {
    async fn get_parameter(&self, key: &str) -> Result<Option<BusinessParameter>, ServiceError> {
        Ok(business_parameter::Entity::find_by_id(key.to_string()).one(&self.db).await?.map(parameter))
    }

    async fn list_parameters(&self) -> Result<Vec<BusinessParameter>, ServiceError> {
        let rows = business_parameter::Entity::find()
            .order_by_asc(business_parameter::Column::Key)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(parameter).collect())
    }

    async fn upsert_parameter(&self, key: &str, value: &str, description: Option<String>) -> Result<BusinessParameter, ServiceError> {
        Ok(parameter(business_parameter::upsert(&self.db, key, value, description).await?))
    }

    async fn delete_parameter(&self, key: &str) -> Result<bool, ServiceError> {
        let res = business_parameter::Entity::delete_by_id(key.to_string()).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn find_config(&self, account_id: Uuid) -> Result<Option<BusinessConfig>, ServiceError> {
        find_row(&self.db, account_id).await?.map(config).transpose()
    }

    async fn insert_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<BusinessConfig, ServiceError> {
        let now = Utc::now().into();
        let am = business_config::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            config_data: Set(data.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        // account_id 唯一约束保证每个账号只有一份
        config(am.insert(&self.db).await.map_err(|e| config_exists(e.into()))?)
    }

    async fn update_config(&self, account_id: Uuid, data: serde_json::Value) -> Result<Option<BusinessConfig>, ServiceError> {
        let Some(existing) = find_row(&self.db, account_id).await? else {
            return Ok(None);
        };
        let mut am: business_config::ActiveModel = existing.into();
        am.config_data = Set(data.to_string());
        am.updated_at = Set(Utc::now().into());
        Ok(Some(config(am.update(&self.db).await?)?))
    }
}
