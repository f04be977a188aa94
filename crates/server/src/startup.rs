use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{info, warn};

use service::auth::token::TokenIssuer;
use service::Repositories;

use crate::errors::{self, StartupError};
use crate::metrics;
use crate::routes;
use crate::state::ServerState;

/// Connect, migrate and wire every service over the sea-orm repositories.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;

    let state = ServerState::new(Repositories::seaorm(db), TokenIssuer::from_config(&cfg.auth));
    bootstrap_admin(&state, cfg).await?;
    Ok(state)
}

/// 首次启动时按配置创建管理员账号（已存在则跳过）
async fn bootstrap_admin(state: &ServerState, cfg: &AppConfig) -> Result<(), StartupError> {
    let (Some(phone), Some(password)) = (&cfg.auth.bootstrap_admin_phone, &cfg.auth.bootstrap_admin_password) else {
        return Ok(());
    };
    let created = state
        .accounts
        .ensure_admin(phone, password)
        .await
        .map_err(|e| StartupError::Bootstrap(e.to_string()))?;
    if created {
        info!(event = "bootstrap_admin", %phone, "admin account created");
    }
    Ok(())
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl_c");
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    errors::set_debug(cfg.server.debug);
    metrics::init();

    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state);

    // Bind and serve
    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting air-cargo server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}
