use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    EventStore, HistoryStore, UserMutation, UserStore, VideoAdmission, VideoMutation, VideoStore,
};
use crate::{
    error::AppError,
    models::{
        analytics::{ShareEvent, WatchTimeEvent},
        user::{User, WatchHistoryEntry},
        video::Video,
    },
};

/// Users kept in registration order.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().await.clone())
    }

    async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail(user.email));
        }
        if users.iter().any(|u| u.id == user.id) {
            return Err(AppError::InternalServerError(format!(
                "user id collision: {}",
                user.id
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update_with(&self, id: &str, mutation: UserMutation) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut updated = slot.clone();
        mutation(&mut updated)?;
        *slot = updated.clone();
        Ok(updated)
    }
}

/// Videos kept in upload order, which is the catalogue's natural order.
#[derive(Default)]
pub struct MemoryVideoStore {
    videos: RwLock<Vec<Video>>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn get(&self, id: &str) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.iter().find(|v| v.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Video>, AppError> {
        Ok(self.videos.read().await.clone())
    }

    async fn insert(&self, video: Video) -> Result<Video, AppError> {
        self.insert_checked(video, Box::new(|_: &[Video]| Ok(()))).await
    }

    async fn insert_checked(
        &self,
        video: Video,
        admit: VideoAdmission,
    ) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        admit(videos.as_slice())?;
        if videos.iter().any(|v| v.id == video.id) {
            return Err(AppError::InternalServerError(format!(
                "video id collision: {}",
                video.id
            )));
        }
        videos.push(video.clone());
        Ok(video)
    }

    async fn update_with(&self, id: &str, mutation: VideoMutation) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let slot = videos
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let mut updated = slot.clone();
        mutation(&mut updated)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let index = videos
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        Ok(videos.remove(index))
    }
}

/// Watch progress keyed by (user id, video id).
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<HashMap<(String, String), WatchHistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn upsert(&self, entry: WatchHistoryEntry) -> Result<WatchHistoryEntry, AppError> {
        let key = (entry.user_id.clone(), entry.video_id.clone());
        self.entries.write().await.insert(key, entry.clone());
        Ok(entry)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<WatchHistoryEntry>, AppError> {
        let mut entries: Vec<WatchHistoryEntry> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }
}

/// Append-only analytics events.
#[derive(Default)]
pub struct MemoryEventStore {
    watch_time: RwLock<Vec<WatchTimeEvent>>,
    shares: RwLock<Vec<ShareEvent>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn record_watch_time(&self, event: WatchTimeEvent) -> Result<(), AppError> {
        self.watch_time.write().await.push(event);
        Ok(())
    }

    async fn record_share(&self, event: ShareEvent) -> Result<(), AppError> {
        self.shares.write().await.push(event);
        Ok(())
    }

    async fn total_watch_seconds(&self, video_ids: &[String]) -> Result<u64, AppError> {
        Ok(self
            .watch_time
            .read()
            .await
            .iter()
            .filter(|e| video_ids.contains(&e.video_id))
            .map(|e| e.seconds)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;

    fn user(id: &str, email: &str) -> User {
        User::new(id.into(), email.into(), "Someone".into(), "hash".into(), false)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "a@example.com")).await.unwrap();

        let err = store.insert(user("u2", "a@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_record_untouched() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "a@example.com")).await.unwrap();

        let result = store
            .update_with(
                "u1",
                Box::new(|u| {
                    u.name = "Changed".into();
                    Err(AppError::BadRequest("nope".into()))
                }),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(store.get("u1").await.unwrap().unwrap().name, "Someone");
    }

    #[tokio::test]
    async fn history_upsert_replaces_progress() {
        let store = MemoryHistoryStore::new();
        let entry = |progress| WatchHistoryEntry {
            user_id: "u1".into(),
            video_id: "v1".into(),
            progress,
            updated_at: chrono::Utc::now(),
        };
        store.upsert(entry(0.2)).await.unwrap();
        store.upsert(entry(0.9)).await.unwrap();

        let entries = store.list_for_user("u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].progress, 0.9);
        assert!(store.list_for_user("u2").await.unwrap().is_empty());
    }
}
