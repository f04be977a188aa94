use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{check_len, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    /// JSON array of role codes, e.g. `["admin","waybill"]`.
    pub roles: String,
    pub is_active: bool,
    pub token_version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Phone numbers double as login names: 11 digits starting with `1`.
pub fn validate_phone(phone: &str) -> Result<(), ModelError> {
    if phone.len() != 11 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::Validation("phone must be 11 digits".into()));
    }
    if !phone.starts_with('1') {
        return Err(ModelError::Validation("phone format is invalid".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    check_len("name", name, 1, 50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_rules() {
        assert!(validate_phone("13800138000").is_ok());
        assert!(validate_phone("23800138000").is_err());
        assert!(validate_phone("1380013800").is_err());
        assert!(validate_phone("1380013800a").is_err());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("张三").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
    }
}
