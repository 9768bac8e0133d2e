// src/handlers/analytics.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    error::AppError,
    models::analytics::{AnalyticsParams, ShareRequest, WatchTimeRequest},
    services::analytics,
    state::AppState,
    utils::{
        extract::{AppJson, AppQuery},
        jwt::{AuthUser, Claims},
    },
};

/// Daily series and breakdowns for one video.
pub async fn get_video_analytics(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    AppQuery(params): AppQuery<AnalyticsParams>,
) -> Result<impl IntoResponse, AppError> {
    let report = analytics::video_analytics(
        state.videos.as_ref(),
        &video_id,
        params.timeframe.as_deref().unwrap_or("month"),
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(report))
}

/// Dashboard summary over the caller's videos.
pub async fn get_filmmaker_analytics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let report = analytics::filmmaker_analytics(
        state.videos.as_ref(),
        state.events.as_ref(),
        &claims.sub,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(report))
}

/// Records watch time. A bearer token is optional and ties the event to the caller.
pub async fn record_watch_time(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    AppJson(payload): AppJson<WatchTimeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let video_id = payload.video_id.clone();
    let seconds = payload.watch_time_seconds;
    let percentage = payload.percentage_watched;

    analytics::record_watch_time(
        state.events.as_ref(),
        user.map(|u| u.id),
        payload,
        Utc::now(),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "videoId": video_id,
        "recorded": {
            "watchTimeSeconds": seconds,
            "percentageWatched": percentage
        }
    })))
}

pub async fn record_share(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ShareRequest>,
) -> Result<impl IntoResponse, AppError> {
    let video_id = payload.video_id.clone();
    let platform = payload.platform.clone();

    let share_id = analytics::record_share(
        state.videos.as_ref(),
        state.events.as_ref(),
        payload,
        Utc::now(),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "videoId": video_id,
        "platform": platform,
        "shareId": share_id
    })))
}
