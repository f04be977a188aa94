use axum::extract::State;
use uuid::Uuid;

use common::types::ListPage;
use service::auth::rbac::Operation;
use service::department::domain::{Department, DepartmentInput, DepartmentPatch};

use crate::extract::{AppJson, AppPath, CurrentPrincipal};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

#[utoipa::path(
    post, path = "/api/v1/departments", tag = "departments",
    security(("bearer" = [])),
    request_body = crate::openapi::DepartmentDoc,
    responses((status = 200, description = "Created"), (status = 403, description = "Admin only"), (status = 409, description = "Name taken"))
)]
pub async fn create(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<DepartmentInput>,
) -> ApiResult<Department> {
    principal.require(Operation::DepartmentManage)?;
    ok(state.departments.create(input).await?, "部门创建成功")
}

#[utoipa::path(
    get, path = "/api/v1/departments", tag = "departments",
    security(("bearer" = [])),
    responses((status = 200, description = "All departments, newest first"))
)]
pub async fn list(State(state): State<ServerState>, principal: CurrentPrincipal) -> ApiResult<ListPage<Department>> {
    principal.require(Operation::DepartmentManage)?;
    ok(ListPage::all(state.departments.list().await?), "查询成功")
}

#[utoipa::path(
    get, path = "/api/v1/departments/{id}", tag = "departments",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not found"))
)]
pub async fn get(State(state): State<ServerState>, principal: CurrentPrincipal, AppPath(id): AppPath<Uuid>) -> ApiResult<Department> {
    principal.require(Operation::DepartmentManage)?;
    ok(state.departments.get(id).await?, "查询成功")
}

#[utoipa::path(
    put, path = "/api/v1/departments/{id}", tag = "departments",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = crate::openapi::DepartmentPatchDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not found"), (status = 409, description = "Name taken"))
)]
pub async fn update(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<DepartmentPatch>,
) -> ApiResult<Department> {
    principal.require(Operation::DepartmentManage)?;
    ok(state.departments.update(id, patch).await?, "部门更新成功")
}

#[utoipa::path(
    delete, path = "/api/v1/departments/{id}", tag = "departments",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found"), (status = 409, description = "Department still has customers"))
)]
pub async fn delete(State(state): State<ServerState>, principal: CurrentPrincipal, AppPath(id): AppPath<Uuid>) -> ApiResult<()> {
    principal.require(Operation::DepartmentManage)?;
    state.departments.delete(id).await?;
    ok((), "部门删除成功")
}
