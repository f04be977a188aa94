use thiserror::Error;

use super::rbac::Operation;
use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    /// Unknown phone or wrong password; deliberately indistinguishable.
    #[error("incorrect phone or password")]
    InvalidCredentials,
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("account is disabled")]
    Disabled,
    #[error("operation not permitted: {0}")]
    Forbidden(Operation),
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::InvalidCredentials => 1004,
            AuthError::Unauthenticated(_) => 1005,
            AuthError::Disabled => 1006,
            AuthError::Forbidden(_) => 1007,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    pub(crate) fn unauthenticated(msg: &str) -> Self { Self::Unauthenticated(msg.to_string()) }
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => AuthError::Validation(msg),
            ServiceError::Hash(msg) => AuthError::HashError(msg),
            other => AuthError::Repository(other.to_string()),
        }
    }
}
