//! Storage collaborators.
//!
//! Handlers and services only see these traits; `AppState` holds them as
//! `Arc<dyn ...>` so a database-backed implementation can replace the
//! in-memory one without touching handler logic.
//!
//! Every mutation goes through `update_with`, which applies a closure to the
//! record under the store's write lock. The closure works on a copy: when it
//! returns an error, nothing is written back.

mod blob;
mod memory;
pub mod seed;

pub use blob::{BlobStore, LocalBlobStore, MemoryBlobStore};
pub use memory::{MemoryEventStore, MemoryHistoryStore, MemoryUserStore, MemoryVideoStore};

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        analytics::{ShareEvent, WatchTimeEvent},
        user::{User, WatchHistoryEntry},
        video::Video,
    },
};

pub type UserMutation = Box<dyn FnOnce(&mut User) -> Result<(), AppError> + Send>;
pub type VideoMutation = Box<dyn FnOnce(&mut Video) -> Result<(), AppError> + Send>;
/// Sees the whole catalogue right before an insert; an error aborts it.
pub type VideoAdmission = Box<dyn FnOnce(&[Video]) -> Result<(), AppError> + Send>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Fails with `DuplicateEmail` when the email is taken.
    async fn insert(&self, user: User) -> Result<User, AppError>;

    /// Fails with `NotFound` when the user does not exist.
    async fn update_with(&self, id: &str, mutation: UserMutation) -> Result<User, AppError>;
}

#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Video>, AppError>;

    /// All videos in insertion order.
    async fn list(&self) -> Result<Vec<Video>, AppError>;

    async fn insert(&self, video: Video) -> Result<Video, AppError>;

    /// Inserts only if `admit` accepts the current catalogue. The check and
    /// the insert happen under one write lock.
    async fn insert_checked(
        &self,
        video: Video,
        admit: VideoAdmission,
    ) -> Result<Video, AppError>;

    /// Fails with `NotFound` when the video does not exist.
    async fn update_with(&self, id: &str, mutation: VideoMutation) -> Result<Video, AppError>;

    /// Removes and returns the video.
    async fn delete(&self, id: &str) -> Result<Video, AppError>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Inserts or replaces the (user, video) record.
    async fn upsert(&self, entry: WatchHistoryEntry) -> Result<WatchHistoryEntry, AppError>;

    /// Most recently updated first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<WatchHistoryEntry>, AppError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn record_watch_time(&self, event: WatchTimeEvent) -> Result<(), AppError>;

    async fn record_share(&self, event: ShareEvent) -> Result<(), AppError>;

    /// Sum of recorded watch seconds over the given videos.
    async fn total_watch_seconds(&self, video_ids: &[String]) -> Result<u64, AppError>;
}
