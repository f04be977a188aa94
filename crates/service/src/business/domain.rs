use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Global key-value parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessParameter {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Set request; an absent description keeps the stored one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInput {
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-account business configuration document
/// (airline → business type → parameter group → items).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessConfig {
    pub id: Uuid,
    pub account_id: Uuid,
    pub config_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInput {
    pub config_data: serde_json::Value,
}
