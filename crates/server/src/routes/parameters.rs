use axum::extract::State;

use service::auth::rbac::Operation;
use service::business::domain::{BusinessParameter, ParameterInput};

use crate::extract::{AppJson, AppPath, CurrentPrincipal};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/api/v1/parameters", tag = "parameters",
    security(("bearer" = [])),
    responses((status = 200, description = "All parameters ordered by key"))
)]
pub async fn list(State(state): State<ServerState>, principal: CurrentPrincipal) -> ApiResult<Vec<BusinessParameter>> {
    principal.require(Operation::ParameterRead)?;
    ok(state.business.list_parameters().await?, "查询成功")
}

#[utoipa::path(
    get, path = "/api/v1/parameters/{key}", tag = "parameters",
    security(("bearer" = [])),
    params(("key" = String, Path, description = "Parameter key")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not found"))
)]
pub async fn get(State(state): State<ServerState>, principal: CurrentPrincipal, AppPath(key): AppPath<String>) -> ApiResult<BusinessParameter> {
    principal.require(Operation::ParameterRead)?;
    ok(state.business.get_parameter(&key).await?, "查询成功")
}

#[utoipa::path(
    put, path = "/api/v1/parameters/{key}", tag = "parameters",
    security(("bearer" = [])),
    params(("key" = String, Path, description = "Parameter key")),
    request_body = crate::openapi::ParameterDoc,
    responses((status = 200, description = "Stored"), (status = 400, description = "Invalid key"), (status = 403, description = "Admin only"))
)]
pub async fn set(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppPath(key): AppPath<String>,
    AppJson(input): AppJson<ParameterInput>,
) -> ApiResult<BusinessParameter> {
    principal.require(Operation::ParameterWrite)?;
    ok(state.business.set_parameter(&key, input).await?, "保存成功")
}

#[utoipa::path(
    delete, path = "/api/v1/parameters/{key}", tag = "parameters",
    security(("bearer" = [])),
    params(("key" = String, Path, description = "Parameter key")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found"))
)]
pub async fn delete(State(state): State<ServerState>, principal: CurrentPrincipal, AppPath(key): AppPath<String>) -> ApiResult<()> {
    principal.require(Operation::ParameterWrite)?;
    state.business.delete_parameter(&key).await?;
    ok((), "删除成功")
}
