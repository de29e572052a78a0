use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::content::input::AboutPatch;
use crate::content::{About, Certificate, Entity, Project, Skill, SocialLink, TimelineEvent};
use crate::error::AppResult;
use crate::extractors::{AdminSession, ApiJson};
use crate::state::AppState;

/// GET /api/{entity}
async fn list<E: Entity>(State(state): State<AppState>) -> AppResult<Json<Vec<E>>> {
    Ok(Json(state.content.list::<E>().await?))
}

/// GET /api/{entity}/{id}
async fn show<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<E>> {
    Ok(Json(state.content.get::<E>(&id).await?))
}

/// POST /api/{entity}
async fn create<E: Entity>(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<E::Create>,
) -> AppResult<(StatusCode, Json<E>)> {
    let record = state.content.create::<E>(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/{entity}/{id}
async fn update<E: Entity>(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<E::Patch>,
) -> AppResult<Json<E>> {
    Ok(Json(state.content.update::<E>(&id, patch).await?))
}

/// DELETE /api/{entity}/{id}
async fn remove<E: Entity>(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.content.delete::<E>(&id).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/about. The row, or `null` before one exists.
async fn about(State(state): State<AppState>) -> AppResult<Json<Option<About>>> {
    Ok(Json(state.content.about().await?))
}

/// PUT and POST /api/about. Creates the row once, updates it afterwards.
async fn save_about(
    _admin: AdminSession,
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<AboutPatch>,
) -> AppResult<(StatusCode, Json<About>)> {
    let saved = state.content.save_about(patch).await?;
    let status = if saved.was_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(saved.into_inner())))
}

fn entity<E: Entity>(router: Router<AppState>, segment: &str) -> Router<AppState> {
    router
        .route(
            &format!("/api/{}", segment),
            get(list::<E>).post(create::<E>),
        )
        .route(
            &format!("/api/{}/{{id}}", segment),
            get(show::<E>).put(update::<E>).delete(remove::<E>),
        )
}

pub fn router() -> Router<AppState> {
    let router = Router::new().route("/api/about", get(about).put(save_about).post(save_about));
    let router = entity::<Project>(router, "projects");
    let router = entity::<Skill>(router, "skills");
    let router = entity::<SocialLink>(router, "social-links");
    let router = entity::<TimelineEvent>(router, "timeline");
    entity::<Certificate>(router, "certificates")
}
