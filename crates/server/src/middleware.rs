use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use service::auth::errors::AuthError;
use service::auth::gate::bearer_token;

use crate::errors::ApiError;
use crate::metrics::AUTHZ_DENIED_TOTAL;
use crate::state::ServerState;

/// 受保护路由中间件：校验 Authorization: Bearer <token>，解析账号并注入 Principal
/// 缺失、非法、过期或已吊销的 token 返回 401；账号禁用返回 403
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_owned);

    let principal = match bearer_token(header.as_deref()) {
        Ok(token) => state.gate.authenticate(token).await,
        Err(e) => Err(e),
    };

    match principal {
        Ok(p) => {
            req.extensions_mut().insert(p);
            Ok(next.run(req).await)
        }
        Err(e) => {
            let reason = match e {
                AuthError::Disabled => "forbidden",
                _ => "unauthenticated",
            };
            AUTHZ_DENIED_TOTAL.with_label_values(&[reason]).inc();
            warn!(path = %path, reason, err = %e, "request rejected by gate");
            Err(e.into())
        }
    }
}
