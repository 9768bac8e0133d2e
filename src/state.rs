use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    store::{
        BlobStore, EventStore, HistoryStore, MemoryEventStore, MemoryHistoryStore,
        MemoryUserStore, MemoryVideoStore, UserStore, VideoStore,
    },
    utils::jwt::TokenSigner,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub videos: Arc<dyn VideoStore>,
    pub history: Arc<dyn HistoryStore>,
    pub events: Arc<dyn EventStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub tokens: TokenSigner,
    pub config: Config,
}

impl AppState {
    /// State backed by empty in-memory stores and the given blob store.
    pub fn in_memory(config: Config, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            videos: Arc::new(MemoryVideoStore::new()),
            history: Arc::new(MemoryHistoryStore::new()),
            events: Arc::new(MemoryEventStore::new()),
            blobs,
            tokens: TokenSigner::new(&config.jwt_secret, config.jwt_expiration),
            config,
        }
    }
}

impl FromRef<AppState> for TokenSigner {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
