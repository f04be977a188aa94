use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::types::ListPage;
use service::account::domain::{Account, BatchIdsInput, BatchStatusInput, ChangePasswordInput, CreateAccountInput, UpdateAccountInput};
use service::auth::rbac::Operation;

use crate::extract::{AppJson, AppPath, AppQuery, CurrentPrincipal};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub user_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchOutput {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[utoipa::path(
    post, path = "/api/v1/users", tag = "users",
    security(("bearer" = [])),
    request_body = crate::openapi::CreateAccountDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::AccountDoc),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Phone already registered")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<CreateAccountInput>,
) -> ApiResult<Account> {
    principal.require(Operation::AccountManage)?;
    let account = state.accounts.create(input).await?;
    ok(account, "账号创建成功")
}

#[utoipa::path(
    get, path = "/api/v1/users", tag = "users",
    security(("bearer" = [])),
    responses((status = 200, description = "All accounts, newest first"), (status = 403, description = "Admin only"))
)]
pub async fn list(State(state): State<ServerState>, principal: CurrentPrincipal) -> ApiResult<ListPage<Account>> {
    principal.require(Operation::AccountManage)?;
    ok(ListPage::all(state.accounts.list().await?), "查询成功")
}

#[utoipa::path(
    put, path = "/api/v1/users/{id}", tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = crate::openapi::UpdateAccountDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::AccountDoc), (status = 404, description = "Not found"), (status = 409, description = "Phone already registered"))
)]
pub async fn update(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<UpdateAccountInput>,
) -> ApiResult<Account> {
    principal.require(Operation::AccountManage)?;
    ok(state.accounts.update(id, input).await?, "账号更新成功")
}

#[utoipa::path(
    put, path = "/api/v1/users/{id}/status", tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Account ID"), StatusQuery),
    responses((status = 200, description = "Status changed"), (status = 404, description = "Not found"))
)]
pub async fn set_status(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppPath(id): AppPath<Uuid>,
    AppQuery(q): AppQuery<StatusQuery>,
) -> ApiResult<StatusOutput> {
    principal.require(Operation::AccountManage)?;
    let account = state.accounts.set_status(id, q.is_active).await?;
    ok(StatusOutput { user_id: account.id, is_active: account.is_active }, "操作成功")
}

#[utoipa::path(
    put, path = "/api/v1/users/batch-status", tag = "users",
    security(("bearer" = [])),
    request_body = crate::openapi::BatchStatusDoc,
    responses((status = 200, description = "Statuses changed"), (status = 400, description = "Unknown ids"))
)]
pub async fn batch_status(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<BatchStatusInput>,
) -> ApiResult<BatchOutput> {
    principal.require(Operation::AccountManage)?;
    let count = state.accounts.batch_set_status(&input.ids, input.is_active).await?;
    ok(BatchOutput { count, is_active: Some(input.is_active) }, "批量操作成功")
}

/// Own password for everyone; other accounts need account management.
#[utoipa::path(
    put, path = "/api/v1/users/password", tag = "users",
    security(("bearer" = [])),
    request_body = crate::openapi::ChangePasswordDoc,
    responses((status = 200, description = "Password updated"), (status = 403, description = "Not allowed for other accounts"))
)]
pub async fn change_password(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<ChangePasswordInput>,
) -> ApiResult<()> {
    let p = principal.require(Operation::SelfService)?;
    state.accounts.change_password(p, input).await?;
    ok((), "密码更新成功")
}

#[utoipa::path(
    delete, path = "/api/v1/users/{id}", tag = "users",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses((status = 200, description = "Deleted"), (status = 400, description = "Cannot delete own account"), (status = 404, description = "Not found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<()> {
    let p = principal.require(Operation::AccountManage)?;
    state.accounts.delete(p.id(), id).await?;
    ok((), "账号删除成功")
}

#[utoipa::path(
    delete, path = "/api/v1/users", tag = "users",
    security(("bearer" = [])),
    request_body = crate::openapi::BatchIdsDoc,
    responses((status = 200, description = "Deleted"), (status = 400, description = "Own account included or unknown ids"))
)]
pub async fn batch_delete(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<BatchIdsInput>,
) -> ApiResult<BatchOutput> {
    let p = principal.require(Operation::AccountManage)?;
    let count = state.accounts.batch_delete(p.id(), &input.ids).await?;
    ok(BatchOutput { count, is_active: None }, "批量删除成功")
}
