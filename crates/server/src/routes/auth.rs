use axum::extract::State;
use tracing::info;

use service::auth::domain::{AuthSession, LoginInput, RefreshInput};
use service::auth::token::TokenPair;

use crate::extract::AppJson;
use crate::metrics::{LOGIN_FAILURE_TOTAL, LOGIN_SUCCESS_TOTAL};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/api/v1/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = crate::openapi::LoginResponseDoc),
        (status = 401, description = "Incorrect phone or password"),
        (status = 403, description = "Account disabled"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn login(State(state): State<ServerState>, AppJson(input): AppJson<LoginInput>) -> ApiResult<AuthSession> {
    match state.auth.login(input).await {
        Ok(session) => {
            LOGIN_SUCCESS_TOTAL.inc();
            ok(session, "登录成功")
        }
        Err(e) => {
            LOGIN_FAILURE_TOTAL.inc();
            info!(err = %e, "login failed");
            Err(e.into())
        }
    }
}

#[utoipa::path(
    post, path = "/api/v1/auth/refresh", tag = "auth",
    request_body = crate::openapi::RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = crate::openapi::TokenPairDoc),
        (status = 401, description = "Invalid, expired or revoked refresh token"),
        (status = 403, description = "Account disabled")
    )
)]
pub async fn refresh(State(state): State<ServerState>, AppJson(input): AppJson<RefreshInput>) -> ApiResult<TokenPair> {
    let pair = state.auth.refresh(input).await?;
    ok(pair, "刷新成功")
}
