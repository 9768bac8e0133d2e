// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use vidora::{
    config::Config,
    models::video::Video,
    routes,
    state::AppState,
    store::MemoryBlobStore,
};

pub struct TestApp {
    pub address: String,
    pub state: AppState,
    pub blobs: Arc<MemoryBlobStore>,
    pub client: reqwest::Client,
}

/// Helper function to spawn the app on a random port for testing.
/// Stores start empty; uploads go to an in-memory blob store.
pub async fn spawn_app() -> TestApp {
    let config = Config {
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        seed_demo_data: false,
        ..Config::default()
    };

    let blobs = Arc::new(MemoryBlobStore::new());
    let state = AppState::in_memory(config, blobs.clone());
    let app = routes::create_router(state.clone());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        state,
        blobs,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers an account and returns `(token, user id)`.
    pub async fn register(&self, email: &str, is_student: bool) -> (String, String) {
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "email": email,
                "password": "password123",
                "name": "Test User",
                "isStudent": is_student
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Puts a video straight into the store.
    pub async fn insert_video(&self, id: &str, owner: &str, rating: f64, uploaded: DateTime<Utc>) {
        let video = Video {
            id: id.to_string(),
            title: format!("Video {}", id),
            description: "Stored directly".to_string(),
            category: "short-film".to_string(),
            owner_user_id: owner.to_string(),
            upload_date: uploaded,
            duration: 60,
            views: 0,
            average_rating: rating,
            rating_count: if rating > 0.0 { 1 } else { 0 },
            shares: 0,
            thumbnail_url: None,
            video_url: format!("/media/videos/{}.mp4", id),
            is_public: true,
            tags: Vec::new(),
        };
        self.state.videos.insert(video).await.unwrap();
    }
}
