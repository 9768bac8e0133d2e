//! Video catalogue: browsing, upload, rating and owner edits.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::MAX_PAGE_SIZE,
    error::AppError,
    models::{
        user::{FilmmakerSummary, UploadQuota},
        video::{
            CATEGORIES, Category, RatingResponse, UploadFile, UploadMetadata, Video, VideoPatch,
            VideoWithFilmmaker, is_known_category,
        },
    },
    store::{BlobStore, UserStore, VideoAdmission, VideoStore},
    utils::html::clean_text,
};

/// Clamps a client supplied limit into `0..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(0, MAX_PAGE_SIZE as i64) as usize
}

/// `None`, empty and `all` match every category.
pub fn category_matches(filter: Option<&str>, category: &str) -> bool {
    match filter {
        None | Some("") | Some("all") => true,
        Some(wanted) => wanted == category,
    }
}

fn top_by_views(mut videos: Vec<Video>, limit: i64) -> Vec<Video> {
    videos.sort_by(|a, b| b.views.cmp(&a.views));
    videos.truncate(clamp_limit(limit));
    videos
}

/// One page of public videos in store order. Pages start at 1.
pub async fn list(
    videos: &dyn VideoStore,
    category: Option<&str>,
    page: i64,
    limit: i64,
) -> Result<Vec<Video>, AppError> {
    let limit = clamp_limit(limit);
    let offset = (page.max(1) as usize - 1).saturating_mul(limit);

    Ok(videos
        .list()
        .await?
        .into_iter()
        .filter(|v| v.is_public && category_matches(category, &v.category))
        .skip(offset)
        .take(limit)
        .collect())
}

/// Most viewed videos, private ones included.
pub async fn featured(videos: &dyn VideoStore, limit: i64) -> Result<Vec<Video>, AppError> {
    Ok(top_by_views(videos.list().await?, limit))
}

/// Same ranking as `featured`. The timeframe is accepted but all-time views decide.
pub async fn popular(
    videos: &dyn VideoStore,
    timeframe: &str,
    limit: i64,
) -> Result<Vec<Video>, AppError> {
    tracing::debug!("popular videos requested for timeframe '{}'", timeframe);
    Ok(top_by_views(videos.list().await?, limit))
}

pub fn categories() -> &'static [Category] {
    CATEGORIES
}

/// Case-insensitive match on title, description and tags of public videos.
pub async fn search(
    videos: &dyn VideoStore,
    query: &str,
    limit: i64,
) -> Result<Vec<Video>, AppError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::BadRequest("Search query must not be empty".to_string()));
    }

    Ok(videos
        .list()
        .await?
        .into_iter()
        .filter(|v| v.is_public)
        .filter(|v| {
            v.title.to_lowercase().contains(&needle)
                || v.description.to_lowercase().contains(&needle)
                || v.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .take(clamp_limit(limit))
        .collect())
}

pub async fn join_filmmaker(
    users: &dyn UserStore,
    video: Video,
) -> Result<VideoWithFilmmaker, AppError> {
    let filmmaker = match users.get(&video.owner_user_id).await? {
        Some(owner) => FilmmakerSummary::from(&owner),
        None => FilmmakerSummary::unknown(&video.owner_user_id),
    };
    Ok(VideoWithFilmmaker { video, filmmaker })
}

pub async fn get_by_id(
    videos: &dyn VideoStore,
    users: &dyn UserStore,
    id: &str,
) -> Result<VideoWithFilmmaker, AppError> {
    let video = videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    join_filmmaker(users, video).await
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Rejects an upload of `new_seconds` that would break the plan's monthly limits.
pub fn check_quota(
    quota: UploadQuota,
    uploads_this_month: usize,
    seconds_this_month: u64,
    new_seconds: u32,
) -> Result<(), AppError> {
    if let Some(max) = quota.max_minutes_per_video {
        if u64::from(new_seconds) > u64::from(max) * 60 {
            return Err(AppError::QuotaExceeded(format!(
                "videos are limited to {} minutes on this plan",
                max
            )));
        }
    }
    if let Some(max) = quota.max_uploads {
        if uploads_this_month + 1 > max as usize {
            return Err(AppError::QuotaExceeded(format!(
                "{} of {} uploads used this month",
                uploads_this_month, max
            )));
        }
    }
    if let Some(max) = quota.max_minutes {
        if seconds_this_month + u64::from(new_seconds) > u64::from(max) * 60 {
            return Err(AppError::QuotaExceeded(format!(
                "{} of {} minutes used this month",
                seconds_this_month / 60,
                max
            )));
        }
    }
    Ok(())
}

/// Applies `check_quota` to what `owner_id` uploaded in the month of `now`.
fn check_monthly_quota(
    catalogue: &[Video],
    owner_id: &str,
    quota: UploadQuota,
    new_seconds: u32,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let (uploads, seconds) = catalogue
        .iter()
        .filter(|v| v.owner_user_id == owner_id && same_month(v.upload_date, now))
        .fold((0usize, 0u64), |(n, secs), v| (n + 1, secs + u64::from(v.duration)));
    check_quota(quota, uploads, seconds, new_seconds)
}

/// Best effort: blob leftovers are logged, not surfaced.
async fn discard_blobs(blobs: &dyn BlobStore, urls: &[&str]) {
    for url in urls {
        if let Err(e) = blobs.delete(url).await {
            tracing::warn!("Failed to delete blob {}: {}", url, e);
        }
    }
}

/// An upload as received from the multipart form.
#[derive(Debug)]
pub struct NewUpload {
    pub metadata: UploadMetadata,
    pub video_file: UploadFile,
    pub thumbnail: Option<UploadFile>,
}

/// Stores the files and creates the record, after the owner's quota check.
pub async fn upload(
    videos: &dyn VideoStore,
    users: &dyn UserStore,
    blobs: &dyn BlobStore,
    owner_id: &str,
    upload: NewUpload,
    now: DateTime<Utc>,
) -> Result<Video, AppError> {
    let NewUpload {
        metadata,
        video_file,
        thumbnail,
    } = upload;

    metadata.validate()?;
    if video_file.bytes.is_empty() {
        return Err(AppError::BadRequest("videoFile is required".to_string()));
    }

    let owner = users
        .get(owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Early rejection before any file is written; the insert checks again.
    let quota = owner.subscription.quota();
    let duration = metadata.duration;
    check_monthly_quota(&videos.list().await?, &owner.id, quota, duration, now)?;

    let id = Uuid::new_v4().to_string();
    let video_ext = video_file.extension().unwrap_or_else(|| "mp4".to_string());
    let video_url = blobs
        .put(&format!("videos/{}.{}", id, video_ext), video_file.bytes)
        .await?;

    let thumbnail_url = match thumbnail.filter(|t| !t.bytes.is_empty()) {
        Some(thumb) => {
            let ext = thumb.extension().unwrap_or_else(|| "jpg".to_string());
            match blobs.put(&format!("thumbnails/{}.{}", id, ext), thumb.bytes).await {
                Ok(url) => Some(url),
                Err(e) => {
                    discard_blobs(blobs, &[&video_url]).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let video = Video {
        id,
        title: metadata.title.trim().to_string(),
        description: clean_text(&metadata.description),
        category: metadata.category,
        owner_user_id: owner.id,
        upload_date: now,
        duration: metadata.duration,
        views: 0,
        average_rating: 0.0,
        rating_count: 0,
        shares: 0,
        thumbnail_url,
        video_url,
        is_public: metadata.is_public,
        tags: metadata.tags,
    };

    let owner_id = video.owner_user_id.clone();
    let admit: VideoAdmission = Box::new(move |catalogue: &[Video]| {
        check_monthly_quota(catalogue, &owner_id, quota, duration, now)
    });

    match videos.insert_checked(video.clone(), admit).await {
        Ok(video) => {
            tracing::info!("Video {} uploaded by {}", video.id, video.owner_user_id);
            Ok(video)
        }
        Err(e) => {
            let mut urls = vec![video.video_url.as_str()];
            urls.extend(video.thumbnail_url.as_deref());
            discard_blobs(blobs, &urls).await;
            Err(e)
        }
    }
}

/// Accepts 0.5 to 5.0 in half-star steps.
pub fn validate_rating(rating: f64) -> Result<(), AppError> {
    if (0.5..=5.0).contains(&rating) && (rating * 2.0).fract() == 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidRating(rating))
    }
}

/// Folds one rating into the running mean.
pub async fn rate(
    videos: &dyn VideoStore,
    id: &str,
    rating: f64,
) -> Result<RatingResponse, AppError> {
    validate_rating(rating)?;

    let video = videos
        .update_with(
            id,
            Box::new(move |v| {
                let total = v.average_rating * v.rating_count as f64;
                v.average_rating = (total + rating) / (v.rating_count + 1) as f64;
                v.rating_count += 1;
                Ok(())
            }),
        )
        .await?;

    Ok(RatingResponse {
        average_rating: video.average_rating,
        rating_count: video.rating_count,
    })
}

pub async fn record_view(videos: &dyn VideoStore, id: &str) -> Result<u64, AppError> {
    let video = videos
        .update_with(
            id,
            Box::new(|v| {
                v.views = v.views.saturating_add(1);
                Ok(())
            }),
        )
        .await?;
    Ok(video.views)
}

fn ensure_owner(video: &Video, requester_id: &str) -> Result<(), AppError> {
    if video.owner_user_id != requester_id {
        return Err(AppError::Unauthorized(
            "You are not authorized to modify this video".to_string(),
        ));
    }
    Ok(())
}

fn apply_patch(video: &mut Video, patch: VideoPatch) {
    if let Some(title) = patch.title {
        video.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        video.description = clean_text(&description);
    }
    if let Some(category) = patch.category {
        video.category = category;
    }
    if let Some(is_public) = patch.is_public {
        video.is_public = is_public;
    }
    if let Some(tags) = patch.tags {
        video.tags = tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(thumbnail_url) = patch.thumbnail_url {
        video.thumbnail_url = thumbnail_url;
    }
}

/// Applies `patch` if `requester_id` owns the video. A rejected patch changes nothing.
pub async fn update(
    videos: &dyn VideoStore,
    id: &str,
    patch: VideoPatch,
    requester_id: &str,
) -> Result<Video, AppError> {
    patch.validate()?;
    if let Some(category) = &patch.category {
        if !is_known_category(category) {
            return Err(AppError::BadRequest(format!("Unknown category '{}'", category)));
        }
    }

    let requester_id = requester_id.to_string();
    let video = videos
        .update_with(
            id,
            Box::new(move |v| {
                ensure_owner(v, &requester_id)?;
                apply_patch(v, patch);
                Ok(())
            }),
        )
        .await?;

    tracing::info!("Video {} updated", video.id);
    Ok(video)
}

/// Removes the record and its files. Owner only.
pub async fn delete(
    videos: &dyn VideoStore,
    blobs: &dyn BlobStore,
    id: &str,
    requester_id: &str,
) -> Result<(), AppError> {
    let video = videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video, requester_id)?;

    let video = videos.delete(id).await?;
    let mut urls = vec![video.video_url.as_str()];
    urls.extend(video.thumbnail_url.as_deref());
    discard_blobs(blobs, &urls).await;

    tracing::info!("Video {} deleted by {}", video.id, requester_id);
    Ok(())
}
