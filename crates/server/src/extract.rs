//! Request extractors that reject with the JSON error envelope.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::{async_trait, extract::FromRequest};
use tracing::warn;

use service::auth::domain::Principal;
use service::auth::rbac::Operation;

use crate::errors::ApiError;
use crate::metrics::AUTHZ_DENIED_TOTAL;

/// `Json` whose rejection is a 422 envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection is a 422 envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection is a 422 envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Caller resolved by the gate middleware.
pub struct CurrentPrincipal(pub Principal);

impl CurrentPrincipal {
    /// Reject unless the caller may perform `op`.
    pub fn require(&self, op: Operation) -> Result<&Principal, ApiError> {
        if let Err(e) = self.0.require(op) {
            AUTHZ_DENIED_TOTAL.with_label_values(&["forbidden"]).inc();
            warn!(account_id = %self.0.id(), operation = %op, "operation_denied");
            return Err(e.into());
        }
        Ok(&self.0)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "unauthenticated: missing principal"))
    }
}
