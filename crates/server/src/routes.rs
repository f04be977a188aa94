use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{ApiResponse, Health};

use crate::errors::ApiError;
use crate::metrics::encode_metrics;
use crate::middleware::require_bearer_token;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod auth;
pub mod config;
pub mod customers;
pub mod departments;
pub mod parameters;
pub mod user_center;
pub mod users;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap `data` in the success envelope.
pub fn ok<T>(data: T, msg: &str) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data, msg)))
}

#[derive(Serialize)]
pub struct Welcome {
    pub service: &'static str,
    pub version: &'static str,
}

pub async fn root() -> Json<ApiResponse<Welcome>> {
    Json(ApiResponse::success(
        Welcome { service: "air-cargo", version: env!("CARGO_PKG_VERSION") },
        "航空货运物流管理平台",
    ))
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

/// Build the full application router: public routes plus the bearer-protected `/api/v1` tree.
pub fn build_router(state: ServerState) -> Router {
    // Public routes (health, metrics, login)
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh));

    // Protected API routes
    let api = Router::new()
        .route("/user-center/info", get(user_center::info))
        .route("/user-center/password", put(user_center::change_password))
        .route("/users", get(users::list).post(users::create).delete(users::batch_delete))
        .route("/users/batch-status", put(users::batch_status))
        .route("/users/password", put(users::change_password))
        .route("/users/:id", put(users::update).delete(users::delete))
        .route("/users/:id/status", put(users::set_status))
        .route("/departments", get(departments::list).post(departments::create))
        .route(
            "/departments/:id",
            get(departments::get).put(departments::update).delete(departments::delete),
        )
        .route("/customers", get(customers::search).post(customers::create))
        .route(
            "/customers/:id",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
        .route("/parameters", get(parameters::list))
        .route(
            "/parameters/:key",
            get(parameters::get).put(parameters::set).delete(parameters::delete),
        )
        .route("/config/initialize", post(config::initialize))
        .route("/config/current", get(config::current).put(config::update))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token));

    // Compose
    public
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 请求到达时打点
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
