use std::io;

use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Expose internal error messages in 500 responses.
    #[serde(default)]
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), debug: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token issuing and bootstrap account settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_refresh_days")]
    pub refresh_token_expire_days: i64,
    /// Phone of the admin account created on first start, if any.
    #[serde(default)]
    pub bootstrap_admin_phone: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

fn default_access_minutes() -> i64 { 30 * 24 * 60 }
fn default_refresh_days() -> i64 { 90 }

// 上限约十年，保证 now + ttl 不会溢出
const MAX_ACCESS_MINUTES: i64 = 10 * 366 * 24 * 60;
const MAX_REFRESH_DAYS: i64 = 10 * 366;

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_expire_minutes: default_access_minutes(),
            refresh_token_expire_days: default_refresh_days(),
            bootstrap_admin_phone: None,
            bootstrap_admin_password: None,
        }
    }
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Parse the file at `path`; `None` when it does not exist.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(anyhow!("读取配置文件 {path} 失败: {e}")),
    };
    let cfg: AppConfig = toml::from_str(&content).map_err(|e| anyhow!("配置文件 {path} 解析失败: {e}"))?;
    Ok(Some(cfg))
}

impl AppConfig {
    /// Config file if present, otherwise defaults filled from the environment.
    /// A file that exists but does not parse is an error.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = load_optional(&config_path())?.unwrap_or_default();
        cfg.server.normalize_from_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }

    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url 必须以 postgresql:// 或 postgres:// 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret 为空；请在 config.toml 或环境变量 JWT_SECRET 中提供"));
        }
        if !(1..=MAX_ACCESS_MINUTES).contains(&self.access_token_expire_minutes) {
            return Err(anyhow!("auth.access_token_expire_minutes 必须在 1..={MAX_ACCESS_MINUTES} 范围内"));
        }
        if !(1..=MAX_REFRESH_DAYS).contains(&self.refresh_token_expire_days) {
            return Err(anyhow!("auth.refresh_token_expire_days 必须在 1..={MAX_REFRESH_DAYS} 范围内"));
        }
        if self.bootstrap_admin_phone.is_some() != self.bootstrap_admin_password.is_some() {
            return Err(anyhow!("auth.bootstrap_admin_phone 与 bootstrap_admin_password 必须同时提供"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [database]
        url = "postgres://u:p@localhost:5432/cargo"

        [auth]
        jwt_secret = "s3cret"
        refresh_token_expire_days = 7
    "#;

    #[test]
    fn parses_sections_with_defaults() {
        let cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 20);
        assert_eq!(cfg.auth.access_token_expire_minutes, 43200);
        assert_eq!(cfg.auth.refresh_token_expire_days, 7);
    }

    #[test]
    fn validate_accepts_complete_config() {
        let mut cfg: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert!(cfg.normalize_and_validate().is_ok());
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://root@localhost/db".into(), min_connections: 1, max_connections: 2, connect_timeout_secs: 1, acquire_timeout_secs: 1, ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn token_lifetimes_are_bounded() {
        let auth = AuthConfig { jwt_secret: "x".into(), access_token_expire_minutes: 1_000_000_000_000, ..Default::default() };
        assert!(auth.validate().is_err());
        let auth = AuthConfig { jwt_secret: "x".into(), refresh_token_expire_days: MAX_REFRESH_DAYS + 1, ..Default::default() };
        assert!(auth.validate().is_err());
        let auth = AuthConfig { jwt_secret: "x".into(), refresh_token_expire_days: MAX_REFRESH_DAYS, ..Default::default() };
        assert!(auth.validate().is_ok());
    }

    #[test]
    fn defaults_without_file_validate_once_url_and_secret_are_known() {
        assert!(load_optional("/nonexistent/air-cargo-config.toml").unwrap().is_none());

        let mut cfg = AppConfig::default();
        assert_eq!(cfg.database.min_connections, 2);
        assert_eq!(cfg.database.max_connections, 20);
        cfg.database.url = "postgres://u:p@localhost:5432/cargo".into();
        cfg.auth.jwt_secret = "s3cret".into();
        assert!(cfg.normalize_and_validate().is_ok());
    }

    #[test]
    fn env_only_configuration_loads() {
        std::env::set_var("CONFIG_PATH", "/nonexistent/air-cargo-config.toml");
        std::env::set_var("DATABASE_URL", "postgres://u:p@localhost:5432/cargo");
        std::env::set_var("JWT_SECRET", "from-env");
        let cfg = AppConfig::load_or_env().unwrap();
        assert_eq!(cfg.database.url, "postgres://u:p@localhost:5432/cargo");
        assert_eq!(cfg.auth.jwt_secret, "from-env");
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = std::env::temp_dir().join(format!("air-cargo-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[server\nport = ").unwrap();
        let res = load_optional(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(res.is_err());
    }

    #[test]
    fn bootstrap_admin_needs_both_fields() {
        let auth = AuthConfig { jwt_secret: "x".into(), bootstrap_admin_phone: Some("13800000000".into()), ..Default::default() };
        assert!(auth.validate().is_err());
    }
}
