use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::ListPage;
use service::auth::rbac::Operation;
use service::customer::domain::{Customer, CustomerInput, CustomerPatch, CustomerQuery};

use crate::extract::{AppJson, AppPath, AppQuery, CurrentPrincipal};
use crate::routes::{ok, ApiResult};
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Substring of the company name
    pub company_name: Option<String>,
    /// Substring of the contact person
    pub contact_person: Option<String>,
    pub department_id: Option<Uuid>,
    /// 1-based, default 1
    pub page: Option<u32>,
    /// 1..=100, default 10
    pub page_size: Option<u32>,
}

impl From<SearchParams> for CustomerQuery {
    fn from(p: SearchParams) -> Self {
        let defaults = Pagination::default();
        CustomerQuery {
            company_name: p.company_name,
            contact_person: p.contact_person,
            department_id: p.department_id,
            pagination: Pagination {
                page: p.page.unwrap_or(defaults.page),
                per_page: p.page_size.unwrap_or(defaults.per_page),
            },
        }
    }
}

#[utoipa::path(
    post, path = "/api/v1/customers", tag = "customers",
    security(("bearer" = [])),
    request_body = crate::openapi::CustomerDoc,
    responses((status = 200, description = "Created"), (status = 400, description = "Validation error"))
)]
pub async fn create(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppJson(input): AppJson<CustomerInput>,
) -> ApiResult<Customer> {
    principal.require(Operation::CustomerWrite)?;
    ok(state.customers.create(input).await?, "客户创建成功")
}

#[utoipa::path(
    get, path = "/api/v1/customers", tag = "customers",
    security(("bearer" = [])),
    params(SearchParams),
    responses((status = 200, description = "One page of matches, newest first"))
)]
pub async fn search(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppQuery(params): AppQuery<SearchParams>,
) -> ApiResult<ListPage<Customer>> {
    principal.require(Operation::CustomerRead)?;
    ok(state.customers.search(params.into()).await?, "查询成功")
}

#[utoipa::path(
    get, path = "/api/v1/customers/{id}", tag = "customers",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not found"))
)]
pub async fn get(State(state): State<ServerState>, principal: CurrentPrincipal, AppPath(id): AppPath<Uuid>) -> ApiResult<Customer> {
    principal.require(Operation::CustomerRead)?;
    ok(state.customers.get(id).await?, "查询成功")
}

#[utoipa::path(
    put, path = "/api/v1/customers/{id}", tag = "customers",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = crate::openapi::CustomerPatchDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    principal: CurrentPrincipal,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<CustomerPatch>,
) -> ApiResult<Customer> {
    principal.require(Operation::CustomerWrite)?;
    ok(state.customers.update(id, patch).await?, "客户更新成功")
}

#[utoipa::path(
    delete, path = "/api/v1/customers/{id}", tag = "customers",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "Deleted"), (status = 403, description = "Admin only"), (status = 404, description = "Not found"))
)]
pub async fn delete(State(state): State<ServerState>, principal: CurrentPrincipal, AppPath(id): AppPath<Uuid>) -> ApiResult<()> {
    principal.require(Operation::CustomerDelete)?;
    state.customers.delete(id).await?;
    ok((), "客户删除成功")
}
