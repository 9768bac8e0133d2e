// src/handlers/videos.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AppError,
    models::video::{
        FeaturedParams, ListParams, PopularParams, RateParams, SearchParams, UploadFile,
        UploadMetadata, VideoPatch, parse_tags,
    },
    services::videos::{self, NewUpload},
    state::AppState,
    utils::{
        extract::{AppJson, AppQuery},
        jwt::AuthUser,
    },
};

/// Lists public videos, optionally filtered by category.
pub async fn list_videos(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let videos = videos::list(
        state.videos.as_ref(),
        params.category.as_deref(),
        params.page.unwrap_or(1),
        params.limit.unwrap_or(50),
    )
    .await?;

    Ok(Json(videos))
}

pub async fn featured_videos(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FeaturedParams>,
) -> Result<impl IntoResponse, AppError> {
    let videos = videos::featured(state.videos.as_ref(), params.limit.unwrap_or(6)).await?;
    Ok(Json(videos))
}

pub async fn popular_videos(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PopularParams>,
) -> Result<impl IntoResponse, AppError> {
    let videos = videos::popular(
        state.videos.as_ref(),
        params.timeframe.as_deref().unwrap_or("week"),
        params.limit.unwrap_or(10),
    )
    .await?;

    Ok(Json(videos))
}

pub async fn list_categories() -> impl IntoResponse {
    Json(videos::categories())
}

pub async fn search_videos(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let videos = videos::search(
        state.videos.as_ref(),
        &params.query,
        params.limit.unwrap_or(20),
    )
    .await?;

    Ok(Json(videos))
}

/// Returns one video joined with its filmmaker.
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let video = videos::get_by_id(state.videos.as_ref(), state.users.as_ref(), &id).await?;
    Ok(Json(video))
}

/// Uploads a video with its metadata.
///
/// Multipart fields: `title`, `description`, `category`, `isPublic`, `tags`,
/// `duration` (seconds), `videoFile` and an optional `thumbnailFile`.
/// Unknown fields are ignored. Returns 201 Created with the new record.
pub async fn upload_video(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut title = String::new();
    let mut description = String::new();
    let mut category = String::new();
    let mut is_public = true;
    let mut tags = Vec::new();
    let mut duration = 0;
    let mut video_file = None;
    let mut thumbnail = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "videoFile" | "thumbnailFile" => {
                let file = UploadFile {
                    file_name: field.file_name().map(str::to_string),
                    bytes: field.bytes().await?.to_vec(),
                };
                if name == "videoFile" {
                    video_file = Some(file);
                } else {
                    thumbnail = Some(file);
                }
            }
            "title" => title = field.text().await?,
            "description" => description = field.text().await?,
            "category" => category = field.text().await?,
            "isPublic" => is_public = parse_flag(&field.text().await?)?,
            "tags" => tags = parse_tags(&field.text().await?),
            "duration" => duration = parse_duration(&field.text().await?)?,
            other => tracing::debug!("Ignoring upload field '{}'", other),
        }
    }

    let video_file =
        video_file.ok_or_else(|| AppError::BadRequest("videoFile is required".to_string()))?;

    let upload = NewUpload {
        metadata: UploadMetadata {
            title,
            description,
            category,
            is_public,
            tags,
            duration,
        },
        video_file,
        thumbnail,
    };

    let video = videos::upload(
        state.videos.as_ref(),
        state.users.as_ref(),
        state.blobs.as_ref(),
        &user.id,
        upload,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(video)))
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(AppError::BadRequest(format!("Invalid isPublic value '{}'", other))),
    }
}

fn parse_duration(raw: &str) -> Result<u32, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .map_err(|_| AppError::BadRequest(format!("Invalid duration '{}'", raw)))
}

#[derive(Debug, Deserialize)]
struct RateBody {
    rating: f64,
}

/// Rates a video. The rating comes from `?rating=` or a JSON `{"rating": n}` body.
pub async fn rate_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _user: AuthUser,
    AppQuery(params): AppQuery<RateParams>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let rating = match params.rating {
        Some(rating) => rating,
        None if !body.is_empty() => serde_json::from_slice::<RateBody>(&body)?.rating,
        None => return Err(AppError::BadRequest("rating is required".to_string())),
    };

    let result = videos::rate(state.videos.as_ref(), &id, rating).await?;
    Ok(Json(result))
}

pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let views = videos::record_view(state.videos.as_ref(), &id).await?;
    Ok(Json(json!({ "views": views })))
}

/// Updates a video owned by the caller. Only provided fields change.
pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
    AppJson(patch): AppJson<VideoPatch>,
) -> Result<impl IntoResponse, AppError> {
    let video = videos::update(state.videos.as_ref(), &id, patch, &user.id).await?;
    Ok(Json(video))
}

/// Deletes a video owned by the caller, along with its files.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    videos::delete(state.videos.as_ref(), state.blobs.as_ref(), &id, &user.id).await?;
    Ok(Json(json!({ "success": true })))
}
