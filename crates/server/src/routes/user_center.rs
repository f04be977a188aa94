use axum::extract::State;
use serde::{Deserialize, Serialize};

use service::account::domain::{Account, ChangePasswordInput};
use service::auth::rbac::Operation;

use crate::extract::{AppJson, CurrentPrincipal};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

/// Current account plus the operations it may perform.
#[derive(Debug, Serialize)]
pub struct ProfileOutput {
    #[serde(flatten)]
    pub account: Account,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
pub struct OwnPasswordInput {
    #[serde(alias = "password")]
    pub new_password: String,
}

#[utoipa::path(
    get, path = "/api/v1/user-center/info", tag = "user-center",
    security(("bearer" = [])),
    responses((status = 200, description = "Current account", body = crate::openapi::AccountDoc), (status = 401, description = "Unauthenticated"))
)]
pub async fn info(principal: CurrentPrincipal) -> ApiResult<ProfileOutput> {
    let p = principal.require(Operation::SelfService)?;
    ok(ProfileOutput { account: p.account.clone(), operations: p.permissions.iter().collect() }, "查询成功")
}

#[utoipa::path(
    put, path = "/api/v1/user-center/password", tag = "user-center",
    security(("bearer" = [])),
    request_body = crate::openapi::OwnPasswordDoc,
    responses((status = 200, description = "Password changed"), (status = 400, description = "Invalid password"))
)]
pub async fn change_password(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<OwnPasswordInput>,
) -> ApiResult<()> {
    let p = principal.require(Operation::SelfService)?;
    state
        .accounts
        .change_password(p, ChangePasswordInput { account_id: None, new_password: input.new_password })
        .await?;
    ok((), "密码重置成功")
}
