use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use common::types::ApiResponse;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// Error rendered as the `{code, data: null, msg}` envelope with `code` = HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self { Self { status, msg: msg.into() } }

    pub fn unprocessable(msg: impl Into<String>) -> Self { Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg) }

    /// 500 with the detail hidden unless the server runs in debug mode.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        let detail = detail.to_string();
        error!(error = %detail, "internal error");
        let msg = if debug_enabled() { detail } else { "internal server error".to_string() };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

static DEBUG: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

/// Set once at start-up from `server.debug`.
pub fn set_debug(enabled: bool) { let _ = DEBUG.set(enabled); }

fn debug_enabled() -> bool { DEBUG.get().copied().unwrap_or(false) }

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse::error(self.status.as_u16(), self.msg);
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            ServiceError::Forbidden(msg) => ApiError::new(StatusCode::FORBIDDEN, msg),
            other => ApiError::internal(format!("[{}] {}", other.code(), other)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidCredentials | AuthError::Unauthenticated(_) => {
                ApiError::new(StatusCode::UNAUTHORIZED, e.to_string())
            }
            AuthError::Disabled | AuthError::Forbidden(_) => ApiError::new(StatusCode::FORBIDDEN, e.to_string()),
            other => ApiError::internal(format!("[{}] {}", other.code(), other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        warn!(error = %r.body_text(), "rejected json body");
        match r {
            JsonRejection::MissingJsonContentType(_) => ApiError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, r.body_text()),
            _ => ApiError::unprocessable(r.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self { ApiError::unprocessable(r.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self { ApiError::unprocessable(r.body_text()) }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        assert_eq!(ApiError::from(ServiceError::Validation("x".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ServiceError::NotFound("x".into())).status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(ServiceError::Conflict("x".into())).status, StatusCode::CONFLICT);
        let internal = ApiError::from(ServiceError::Db("password=hunter2".into()));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.msg, "internal server error");
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Unauthenticated("x".into())).status, StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::Disabled).status, StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(AuthError::Forbidden(service::auth::rbac::Operation::AccountManage)).status,
            StatusCode::FORBIDDEN
        );
    }
}
