//! Profiles and watch history.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{UpdateProfileRequest, User, WatchHistoryEntry, WatchHistoryRequest},
    store::{HistoryStore, UserStore, VideoStore},
    utils::html::{clean_text, require_web_url},
};

pub async fn get_profile(users: &dyn UserStore, user_id: &str) -> Result<User, AppError> {
    users
        .get(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Applies the provided fields; `null` clears optional ones.
pub async fn update_profile(
    users: &dyn UserStore,
    user_id: &str,
    mut patch: UpdateProfileRequest,
) -> Result<User, AppError> {
    if let Some(name) = patch.name.as_mut() {
        *name = name.trim().to_string();
    }
    patch.validate()?;
    if let Some(Some(links)) = &patch.social_links {
        for (network, url) in links {
            require_web_url(network, url)?;
        }
    }

    let user = users
        .update_with(
            user_id,
            Box::new(move |u| {
                if let Some(name) = patch.name {
                    u.name = name;
                }
                if let Some(bio) = patch.bio {
                    u.bio = bio.map(|b| clean_text(&b));
                }
                if let Some(location) = patch.location {
                    u.location = location;
                }
                if let Some(picture) = patch.profile_picture {
                    u.profile_picture = picture;
                }
                if let Some(school) = patch.school {
                    u.school = school;
                }
                if let Some(links) = patch.social_links {
                    u.social_links = links;
                }
                Ok(())
            }),
        )
        .await?;

    tracing::info!("Profile {} updated", user.id);
    Ok(user)
}

/// Upserts the caller's progress on a video.
pub async fn record_watch_history(
    history: &dyn HistoryStore,
    videos: &dyn VideoStore,
    user_id: &str,
    request: WatchHistoryRequest,
    now: DateTime<Utc>,
) -> Result<WatchHistoryEntry, AppError> {
    if !(0.0..=1.0).contains(&request.progress) {
        return Err(AppError::BadRequest(
            "progress must be between 0 and 1".to_string(),
        ));
    }
    if videos.get(&request.video_id).await?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    history
        .upsert(WatchHistoryEntry {
            user_id: user_id.to_string(),
            video_id: request.video_id,
            progress: request.progress,
            updated_at: now,
        })
        .await
}

pub async fn watch_history(
    history: &dyn HistoryStore,
    user_id: &str,
) -> Result<Vec<WatchHistoryEntry>, AppError> {
    history.list_for_user(user_id).await
}
