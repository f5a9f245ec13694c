#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use kindred_api::auth::jwt::{Claims, JwtConfig};
use kindred_api::background::theme_presenter;
use kindred_api::config::ServerConfig;
use kindred_api::router::build_app_router;
use kindred_api::state::AppState;
use kindred_core::context::{ColorSchemeSignal, SiteConfigContext};
use kindred_core::presenter::{PresenterTask, TokenSurface};
use kindred_core::store::MemorySettingsStore;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        system_prefers_dark: false,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// A running app over an in-memory settings store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemorySettingsStore>,
    pub presenter: PresenterTask,
}

/// Build the app over an empty store.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(MemorySettingsStore::new()).await
}

/// Build the full application router with all middleware layers, loading the
/// site configuration from `store` first.
///
/// Mirrors `main.rs` so integration tests exercise the same middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery, maintenance gate).
pub async fn build_test_app_with(store: MemorySettingsStore) -> TestApp {
    let config = test_config();
    let store = Arc::new(store);
    let site_config = Arc::new(SiteConfigContext::new(store.clone()));
    site_config.load().await;

    let state = AppState {
        pool: None,
        config: Arc::new(config.clone()),
        site_config,
        color_scheme: ColorSchemeSignal::new(config.system_prefers_dark),
        theme_surface: Arc::new(RwLock::new(TokenSurface::new())),
    };
    let presenter = theme_presenter::start(&state, CancellationToken::new());
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        store,
        presenter,
    }
}

/// Mint an HS256 token for `role`, signed with the test secret.
pub fn token(role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: format!("{role}-1"),
        role: role.to_string(),
        exp: now + 600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn admin_token() -> String {
    token("admin")
}

/// Send a request through a clone of the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn get_with(app: &Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn get_as(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let auth = format!("Bearer {token}");
    get_with(app, uri, &[("authorization", auth.as_str())]).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_raw(app: &Router, uri: &str, token: Option<&str>, body: &str) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
