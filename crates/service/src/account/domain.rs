use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::rbac::Role;

/// Department an account belongs to, as shown on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub id: Uuid,
    pub name: String,
}

/// Domain account (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub phone: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    #[serde(skip)]
    pub token_version: i64,
    pub departments: Vec<DepartmentRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone)]
pub struct Credentials {
    pub account_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Fully validated account ready to be stored, credentials included.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub phone: String,
    pub name: String,
    pub roles: Vec<Role>,
    pub department_ids: Vec<Uuid>,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Field changes applied by the repository. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub phone: Option<String>,
    pub name: Option<String>,
    pub roles: Option<Vec<Role>>,
    pub department_ids: Option<Vec<Uuid>>,
}

impl AccountPatch {
    /// Phone and role changes invalidate issued tokens.
    pub fn revokes_tokens(&self) -> bool { self.phone.is_some() || self.roles.is_some() }
}

/// Create-account request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountInput {
    pub phone: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub department_ids: Vec<Uuid>,
    /// Role codes or console labels.
    #[serde(default, alias = "permissions")]
    pub roles: Vec<String>,
}

/// Update-account request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountInput {
    pub phone: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub department_ids: Option<Vec<Uuid>>,
    #[serde(default, alias = "permissions")]
    pub roles: Option<Vec<String>>,
}

/// Password change request; `account_id` defaults to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordInput {
    #[serde(default, alias = "user_id")]
    pub account_id: Option<Uuid>,
    #[serde(alias = "password")]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchIdsInput {
    #[serde(alias = "user_ids")]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStatusInput {
    #[serde(alias = "user_ids")]
    pub ids: Vec<Uuid>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_console_field_names() {
        let id = Uuid::new_v4();
        let raw = r#"{"phone":"13800000000","password":"secret1","name":"A","permissions":["运单管理"]}"#;
        let c: CreateAccountInput = serde_json::from_str(raw).unwrap();
        assert_eq!(c.roles, vec!["运单管理".to_string()]);

        let raw = format!(r#"{{"user_id":"{id}","password":"secret1"}}"#);
        let p: ChangePasswordInput = serde_json::from_str(&raw).unwrap();
        assert_eq!(p.account_id, Some(id));
        assert_eq!(p.new_password, "secret1");

        let raw = format!(r#"{{"user_ids":["{id}"],"is_active":false}}"#);
        let b: BatchStatusInput = serde_json::from_str(&raw).unwrap();
        assert_eq!(b.ids, vec![id]);
    }

    #[test]
    fn token_version_is_not_serialized() {
        let now = Utc::now();
        let a = Account {
            id: Uuid::new_v4(),
            phone: "13800000000".into(),
            name: "A".into(),
            roles: vec![Role::Admin],
            is_active: true,
            token_version: 7,
            departments: vec![],
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(&a).unwrap();
        assert!(v.get("token_version").is_none());
        assert_eq!(v["roles"], serde_json::json!(["admin"]));
    }
}
