//! Global key-value business parameters.
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{check_len, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_parameter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(column_type = "Text")]
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Keys are 1..=100 chars of `[A-Za-z0-9_.-]`.
pub fn validate_key(key: &str) -> Result<(), ModelError> {
    if key.is_empty() || key.len() > 100 {
        return Err(ModelError::Validation("key length must be between 1 and 100".into()));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
        return Err(ModelError::Validation("key may only contain letters, digits, '_', '.' and '-'".into()));
    }
    Ok(())
}

pub fn validate_description(d: &str) -> Result<(), ModelError> {
    check_len("description", d, 0, 255)
}

/// Insert or overwrite a parameter.
pub async fn upsert<C: ConnectionTrait>(
    db: &C,
    key: &str,
    value: &str,
    description: Option<String>,
) -> Result<Model, ModelError> {
    validate_key(key)?;
    if let Some(d) = &description { validate_description(d)?; }
    let now = Utc::now().into();
    match Entity::find_by_id(key.to_string()).one(db).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.value = Set(value.to_string());
            if description.is_some() {
                am.description = Set(description);
            }
            am.updated_at = Set(now);
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                description: Set(description),
                updated_at: Set(now),
            };
            Ok(am.insert(db).await?)
        }
    }
}
