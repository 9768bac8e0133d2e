// src/store/seed.rs

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::AppError,
    models::{
        user::{Subscription, User},
        video::Video,
    },
    state::AppState,
    utils::hash::hash_password,
};

pub const DEMO_PASSWORD: &str = "password";

struct DemoVideo {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    owner: &'static str,
    days_ago: i64,
    duration: u32,
    views: u64,
    average_rating: f64,
    rating_count: u64,
    shares: u64,
    tags: &'static [&'static str],
}

const DEMO_VIDEOS: [DemoVideo; 4] = [
    DemoVideo {
        id: "video1",
        title: "Amazing Short Film",
        description: "A beautiful short film about nature",
        category: "short-film",
        owner: "user123",
        days_ago: 20,
        duration: 480,
        views: 5000,
        average_rating: 4.8,
        rating_count: 120,
        shares: 300,
        tags: &["nature", "cinematic", "4k"],
    },
    DemoVideo {
        id: "video2",
        title: "Commercial Demo",
        description: "A sample commercial for a fictional product",
        category: "commercial",
        owner: "user123",
        days_ago: 15,
        duration: 60,
        views: 3000,
        average_rating: 4.5,
        rating_count: 80,
        shares: 150,
        tags: &["commercial", "product", "advertisement"],
    },
    DemoVideo {
        id: "video3",
        title: "Student Project",
        description: "An impressive student film project",
        category: "short-film",
        owner: "student1",
        days_ago: 10,
        duration: 300,
        views: 3000,
        average_rating: 4.9,
        rating_count: 80,
        shares: 150,
        tags: &["student", "drama"],
    },
    DemoVideo {
        id: "past1",
        title: "Last Year's Winner",
        description: "Festival favourite from the previous season",
        category: "indie-film",
        owner: "user123",
        days_ago: 400,
        duration: 900,
        views: 12000,
        average_rating: 4.7,
        rating_count: 310,
        shares: 800,
        tags: &["festival", "indie"],
    },
];

fn demo_video(demo: &DemoVideo, now: DateTime<Utc>) -> Video {
    Video {
        id: demo.id.to_string(),
        title: demo.title.to_string(),
        description: demo.description.to_string(),
        category: demo.category.to_string(),
        owner_user_id: demo.owner.to_string(),
        upload_date: now - Duration::days(demo.days_ago),
        duration: demo.duration,
        views: demo.views,
        average_rating: demo.average_rating,
        rating_count: demo.rating_count,
        shares: demo.shares,
        thumbnail_url: Some(format!("/media/thumbnails/{}.jpg", demo.id)),
        video_url: format!("/media/videos/{}.mp4", demo.id),
        is_public: true,
        tags: demo.tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Inserts the demo accounts and catalogue. Skips everything when the
/// filmmaker account already exists.
pub async fn seed_demo_data(state: &AppState) -> Result<(), AppError> {
    if state
        .users
        .find_by_email("filmmaker@example.com")
        .await?
        .is_some()
    {
        tracing::debug!("Demo data already present, skipping seed");
        return Ok(());
    }

    let password = hash_password(DEMO_PASSWORD)?;

    let mut filmmaker = User::new(
        "user123".to_string(),
        "filmmaker@example.com".to_string(),
        "Test Filmmaker".to_string(),
        password.clone(),
        false,
    );
    filmmaker.subscription = Subscription::Pro;
    filmmaker.bio = Some("Independent director working in short form.".to_string());
    state.users.insert(filmmaker).await?;

    let mut student = User::new(
        "student1".to_string(),
        "student@example.com".to_string(),
        "Film Student".to_string(),
        password,
        true,
    );
    student.is_verified = true;
    student.subscription = Subscription::Student;
    student.school = Some("NYU Tisch School of the Arts".to_string());
    state.users.insert(student).await?;

    let now = Utc::now();
    for demo in &DEMO_VIDEOS {
        state.videos.insert(demo_video(demo, now)).await?;
    }

    tracing::info!(
        "Seeded 2 demo users and {} demo videos",
        DEMO_VIDEOS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::Config, store::MemoryBlobStore};

    #[tokio::test]
    async fn seeding_twice_is_a_no_op() {
        let state = AppState::in_memory(Config::default(), Arc::new(MemoryBlobStore::new()));
        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(state.users.list().await.unwrap().len(), 2);
        assert_eq!(state.videos.list().await.unwrap().len(), DEMO_VIDEOS.len());

        let student = state
            .users
            .find_by_email("student@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(student.is_student && student.is_verified);
    }
}
