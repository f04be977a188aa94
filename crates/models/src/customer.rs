use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department;
use crate::errors::{check_len, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_name: String,
    pub settlement_method: String,
    /// Yuan per kilogram.
    pub rate: f64,
    pub contact_person: String,
    pub contact_phone: String,
    pub department_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Department }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Department => Entity::belongs_to(department::Entity)
                .from(Column::DepartmentId)
                .to(department::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_company_name(v: &str) -> Result<(), ModelError> { check_len("company_name", v, 1, 200) }
pub fn validate_settlement_method(v: &str) -> Result<(), ModelError> { check_len("settlement_method", v, 1, 50) }
pub fn validate_contact_person(v: &str) -> Result<(), ModelError> { check_len("contact_person", v, 1, 50) }
pub fn validate_contact_phone(v: &str) -> Result<(), ModelError> { check_len("contact_phone", v, 1, 20) }

pub fn validate_rate(rate: f64) -> Result<(), ModelError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(ModelError::Validation("rate must be a non-negative number".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_must_be_non_negative() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(12.5).is_ok());
        assert!(validate_rate(-0.01).is_err());
        assert!(validate_rate(f64::NAN).is_err());
    }

    #[test]
    fn contact_phone_is_bounded() {
        assert!(validate_contact_phone("0755-12345678").is_ok());
        assert!(validate_contact_phone("").is_err());
        assert!(validate_contact_phone(&"1".repeat(21)).is_err());
    }
}
