#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use folio::config::Config;
use folio::content::ContentRepository;
use folio::db;
use folio::routes;
use folio::state::AppState;
use folio::store::{ContentStore, SqliteStore, UnconfiguredStore};

pub const PASSWORD: &str = "admin123";

fn config() -> Config {
    let mut config = Config::default();
    config.admin.password = Some(PASSWORD.to_string());
    config
}

fn app_with(store: Arc<dyn ContentStore>) -> Router {
    routes::app(AppState::new(config(), ContentRepository::new(store)))
}

/// Full router over a fresh in-memory database.
pub fn sqlite_app() -> Router {
    let pool = db::memory_pool().unwrap();
    db::run_migrations(&pool).unwrap();
    app_with(Arc::new(SqliteStore::new(pool)))
}

pub fn unconfigured_app() -> Router {
    app_with(Arc::new(UnconfiguredStore))
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("not JSON ({}): {}", e, self.body))
    }
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub async fn get(app: &Router, uri: &str) -> Reply {
    call(app, Method::GET, uri, None, None).await
}

/// Sign in and return the `name=value` pair to send back as a cookie.
pub async fn login(app: &Router) -> String {
    let reply = call(
        app,
        Method::POST,
        "/api/admin/login",
        None,
        Some(serde_json::json!({ "username": "admin", "password": PASSWORD })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);

    let set_cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}
