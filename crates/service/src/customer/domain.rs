use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::pagination::Pagination;

use crate::department::domain::present;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub company_name: String,
    pub settlement_method: String,
    /// Yuan per kilogram.
    pub rate: f64,
    pub contact_person: String,
    pub contact_phone: String,
    pub department_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
    pub company_name: String,
    pub settlement_method: String,
    pub rate: f64,
    pub contact_person: String,
    pub contact_phone: String,
    #[serde(default)]
    pub department_id: Option<Uuid>,
}

/// Update request; absent fields are kept, `department_id: null` detaches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerPatch {
    pub company_name: Option<String>,
    pub settlement_method: Option<String>,
    pub rate: Option<f64>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub department_id: Option<Option<Uuid>>,
}

/// Search filters. Text filters are substring matches.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub department_id: Option<Uuid>,
    pub pagination: Pagination,
}

impl CustomerQuery {
    /// Blank filters are dropped.
    pub fn normalized(mut self) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.company_name = clean(self.company_name);
        self.contact_person = clean(self.contact_person);
        self
    }

    pub fn matches(&self, c: &Customer) -> bool {
        self.company_name.as_deref().map_or(true, |q| c.company_name.contains(q))
            && self.contact_person.as_deref().map_or(true, |q| c.contact_person.contains(q))
            && self.department_id.map_or(true, |d| c.department_id == Some(d))
    }
}
