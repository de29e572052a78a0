use askama::Template;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::credentials::Credentials;
use crate::auth::guard::{CookieProbe, SessionProbe};
use crate::error::{AppError, AppResult};
use crate::extractors::{ApiJson, SessionToken};
use crate::routes::home::Html;
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub configured: bool,
}

// -- Request types --

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Handlers --

/// GET /admin/login
pub async fn login_page(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Response {
    let probe = CookieProbe::new(&state.sessions, token.as_deref());
    if let Ok(true) = probe.authenticated().await {
        return Redirect::to("/admin").into_response();
    }

    Html(LoginTemplate {
        configured: state.content.is_configured(),
    })
    .into_response()
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Response> {
    let credentials = Credentials::from_config(&state.config.admin);
    if !credentials.verify(&req.username, &req.password).await {
        tracing::warn!("Rejected admin login for {:?}", req.username);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.sessions.lock().await.create();
    tracing::info!("Admin signed in");

    Ok((
        [(header::SET_COOKIE, session_cookie(&state.config.auth, &token))],
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// GET /api/admin/check. Never fails; a failed lookup reads as signed out.
pub async fn check(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Json<serde_json::Value> {
    let probe = CookieProbe::new(&state.sessions, token.as_deref());
    let authenticated = probe.authenticated().await.unwrap_or_else(|e| {
        tracing::warn!("Session check failed: {}", e);
        false
    });
    Json(json!({ "authenticated": authenticated }))
}

/// POST /api/admin/logout. Idempotent.
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Response {
    if let Some(token) = token {
        if state.sessions.lock().await.remove(&token) {
            tracing::info!("Admin signed out");
        }
    }

    (
        [(header::SET_COOKIE, clear_session_cookie(&state.config.auth))],
        Json(json!({ "success": true })),
    )
        .into_response()
}
