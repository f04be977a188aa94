use axum::extract::State;

use service::auth::rbac::Operation;
use service::business::domain::{BusinessConfig, ConfigInput};

use crate::extract::{AppJson, CurrentPrincipal};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/api/v1/config/initialize", tag = "config",
    security(("bearer" = [])),
    request_body = crate::openapi::ConfigDoc,
    responses((status = 200, description = "Initialized"), (status = 400, description = "Already initialized or not an object"))
)]
pub async fn initialize(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<ConfigInput>,
) -> ApiResult<BusinessConfig> {
    let p = principal.require(Operation::BusinessConfig)?;
    ok(state.business.initialize_config(p.id(), input.config_data).await?, "配置初始化成功")
}

#[utoipa::path(
    get, path = "/api/v1/config/current", tag = "config",
    security(("bearer" = [])),
    responses((status = 200, description = "Caller's config"), (status = 404, description = "Not initialized"))
)]
pub async fn current(State(state): State<ServerState>, principal: CurrentPrincipal) -> ApiResult<BusinessConfig> {
    let p = principal.require(Operation::BusinessConfig)?;
    ok(state.business.current_config(p.id()).await?, "查询成功")
}

#[utoipa::path(
    put, path = "/api/v1/config/current", tag = "config",
    security(("bearer" = [])),
    request_body = crate::openapi::ConfigDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not initialized"))
)]
pub async fn update(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<ConfigInput>,
) -> ApiResult<BusinessConfig> {
    let p = principal.require(Operation::BusinessConfig)?;
    ok(state.business.update_config(p.id(), input.config_data).await?, "更新成功")
}
