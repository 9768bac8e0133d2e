// src/handlers/users.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    models::user::{UpdateProfileRequest, WatchHistoryRequest},
    services::users,
    state::AppState,
    utils::{
        extract::AppJson,
        jwt::Claims,
    },
};

/// Get the caller's own profile.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::get_profile(state.users.as_ref(), &claims.sub).await?;
    Ok(Json(user))
}

/// Public profile lookup by id.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::get_profile(state.users.as_ref(), &user_id).await?;
    Ok(Json(user))
}

/// Partially update the caller's profile.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(patch): AppJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::update_profile(state.users.as_ref(), &claims.sub, patch).await?;
    Ok(Json(user))
}

pub async fn record_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<WatchHistoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let entry = users::record_watch_history(
        state.history.as_ref(),
        state.videos.as_ref(),
        &claims.sub,
        payload,
        Utc::now(),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "videoId": entry.video_id,
        "progress": entry.progress
    })))
}

/// The caller's watch history, most recent first.
pub async fn list_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let entries = users::watch_history(state.history.as_ref(), &claims.sub).await?;
    Ok(Json(entries))
}
