use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Response envelope shared by every JSON endpoint: `{code, data, msg}`.
/// `code` is 0 on success and the HTTP status otherwise.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub data: Option<T>,
    pub msg: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, msg: impl Into<String>) -> Self {
        Self { code: 0, data: Some(data), msg: msg.into() }
    }

    pub fn error(code: u16, msg: impl Into<String>) -> Self {
        Self { code, data: None, msg: msg.into() }
    }
}

/// `{total, items}` listing payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListPage<T> {
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> ListPage<T> {
    pub fn new(total: u64, items: Vec<T>) -> Self { Self { total, items } }

    /// Whole collection returned at once.
    pub fn all(items: Vec<T>) -> Self {
        Self { total: items.len() as u64, items }
    }
}
