#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::build_router;
use server::state::ServerState;
use service::account::domain::CreateAccountInput;
use service::auth::token::TokenIssuer;
use service::mock::MockStore;
use service::Repositories;

pub const SECRET: &str = "integration-secret";
pub const PASSWORD: &str = "secret123";
pub const ADMIN_PHONE: &str = "13800000000";

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    pub tokens: TokenIssuer,
}

pub fn app() -> TestApp {
    let repos = Repositories::shared(Arc::new(MockStore::default()));
    let tokens = TokenIssuer::new(SECRET, Duration::minutes(30), Duration::days(1));
    let state = ServerState::new(repos, tokens.clone());
    TestApp { router: build_router(state.clone()), state, tokens }
}

impl TestApp {
    pub async fn seed(&self, phone: &str, roles: &[&str]) -> Uuid {
        self.state
            .accounts
            .create(CreateAccountInput {
                phone: phone.into(),
                password: PASSWORD.into(),
                name: format!("user-{phone}"),
                department_ids: vec![],
                roles: roles.iter().map(|r| r.to_string()).collect(),
            })
            .await
            .unwrap()
            .id
    }

    /// Seed the admin account and return its access token.
    pub async fn admin(&self) -> (Uuid, String) {
        let id = self.seed(ADMIN_PHONE, &["admin"]).await;
        (id, self.login(ADMIN_PHONE).await)
    }

    pub async fn login(&self, phone: &str) -> String {
        let (status, body) = self
            .call("POST", "/api/v1/auth/login", None, Some(json!({ "phone": phone, "password": PASSWORD })))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }
}
