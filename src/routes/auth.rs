use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(handlers::login_page))
        .route("/api/admin/login", post(handlers::login))
        .route("/api/admin/check", get(handlers::check))
        .route("/api/admin/logout", post(handlers::logout))
}
