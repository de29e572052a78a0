pub mod admin;
pub mod api;
pub mod assets;
pub mod auth;
pub mod home;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The whole site: public pages, admin dashboard, JSON API and assets.
pub fn app(state: AppState) -> Router {
    // Content reads are public; writes stay same-origin behind the cookie.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/", get(home::index))
        .route("/portfolio", get(home::showcase))
        .route("/admin", get(admin::dashboard))
        .route("/admin-dashboard", get(admin::legacy_dashboard))
        .route("/assets/{*path}", get(assets::serve))
        .merge(auth::router())
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
