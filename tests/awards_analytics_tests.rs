// tests/awards_analytics_tests.rs

mod common;

use chrono::{Datelike, Duration, Utc};
use common::spawn_app;
use serde_json::{Value, json};
use vidora::store::seed::seed_demo_data;

async fn get_json(app: &common::TestApp, path: &str) -> (u16, Value) {
    let response = app
        .client
        .get(app.url(path))
        .send()
        .await
        .expect("Failed to execute request");
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn leaderboard_ranks_by_rating_within_category() {
    let app = spawn_app().await;
    seed_demo_data(&app.state).await.unwrap();

    let (status, top) = get_json(&app, "/api/awards/leaderboard?category=short-film&limit=1").await;
    assert_eq!(status, 200);
    let top = top.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["id"], "video3");
    assert!((top[0]["averageRating"].as_f64().unwrap() - 4.9).abs() < 1e-9);
    assert_eq!(top[0]["filmmaker"]["name"], "Film Student");
    assert_eq!(top[0]["filmmaker"]["isStudent"], true);

    let (_, all) = get_json(&app, "/api/awards/leaderboard").await;
    let ratings: Vec<f64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["averageRating"].as_f64().unwrap())
        .collect();
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn hall_of_fame_covers_current_and_past_years() {
    let app = spawn_app().await;
    seed_demo_data(&app.state).await.unwrap();

    let (status, hall) = get_json(&app, "/api/awards/hall-of-fame").await;
    assert_eq!(status, 200);
    assert_eq!(hall["currentYear"]["year"], Utc::now().year());

    let past = hall["pastYears"].as_array().unwrap();
    assert!(!past.is_empty());
    let years: Vec<i64> = past.iter().map(|y| y["year"].as_i64().unwrap()).collect();
    assert!(years.windows(2).all(|w| w[0] > w[1]));
    assert!(past.iter().any(|y| y["filmOfTheYear"]["id"] == "past1"));
}

#[tokio::test]
async fn monthly_winners_only_include_that_month() {
    let app = spawn_app().await;
    let (_, user_id) = app.register("maker@example.com", false).await;
    let now = Utc::now();
    let last_year = now - Duration::days(400);
    app.insert_video("now-low", &user_id, 3.5, now).await;
    app.insert_video("now-high", &user_id, 4.5, now).await;
    app.insert_video("old", &user_id, 5.0, last_year).await;

    let (status, body) = get_json(&app, "/api/awards/monthly-winners").await;
    assert_eq!(status, 200);
    assert_eq!(body["month"], now.month());
    let winners = body["winners"].as_array().unwrap();
    let ranked: Vec<(i64, &str)> = winners
        .iter()
        .map(|w| (w["rank"].as_i64().unwrap(), w["id"].as_str().unwrap()))
        .collect();
    assert_eq!(ranked, [(1, "now-high"), (2, "now-low")]);

    let (status, _) = get_json(&app, "/api/awards/monthly-winners?month=13").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn video_analytics_is_stable_and_sized_by_timeframe() {
    let app = spawn_app().await;
    seed_demo_data(&app.state).await.unwrap();

    let (status, week) = get_json(&app, "/api/analytics/video/video1?timeframe=week").await;
    assert_eq!(status, 200);
    let daily = week["dailyData"].as_array().unwrap();
    assert_eq!(daily.len(), 7);
    assert!(daily[0]["date"].as_str().unwrap() < daily[6]["date"].as_str().unwrap());
    assert_eq!(
        daily[6]["date"],
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    );

    let (_, again) = get_json(&app, "/api/analytics/video/video1?timeframe=week").await;
    assert_eq!(week, again);

    let (_, month) = get_json(&app, "/api/analytics/video/video1").await;
    assert_eq!(month["dailyData"].as_array().unwrap().len(), 30);

    let (status, _) = get_json(&app, "/api/analytics/video/ghost").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn filmmaker_analytics_needs_auth_and_aggregates() {
    let app = spawn_app().await;
    let (token, user_id) = app.register("maker@example.com", false).await;
    app.insert_video("mine", &user_id, 4.0, Utc::now()).await;

    let anonymous = app
        .client
        .get(app.url("/api/analytics/filmmaker"))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let watch = app
        .client
        .post(app.url("/api/analytics/watch-time"))
        .bearer_auth(&token)
        .json(&json!({ "videoId": "mine", "watchTimeSeconds": 45, "percentageWatched": 75.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(watch.status().as_u16(), 200);

    let report: Value = app
        .client
        .get(app.url("/api/analytics/filmmaker"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["totalVideos"], 1);
    assert_eq!(report["totalWatchTime"], 45);
    assert_eq!(report["topVideos"][0]["id"], "mine");
    assert_eq!(report["viewsByDay"].as_array().unwrap().len(), 30);
    assert_eq!(report["geographicDistribution"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn shares_and_watch_time_are_recorded() {
    let app = spawn_app().await;
    let (_, user_id) = app.register("maker@example.com", false).await;
    app.insert_video("v1", &user_id, 0.0, Utc::now()).await;

    let share: Value = app
        .client
        .post(app.url("/api/analytics/shares"))
        .json(&json!({ "videoId": "v1", "platform": "twitter", "url": "https://x.com/p/1" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(share["shareId"].as_str().unwrap().starts_with("share_"));
    assert_eq!(app.state.videos.get("v1").await.unwrap().unwrap().shares, 1);

    let anonymous_watch = app
        .client
        .post(app.url("/api/analytics/watch-time"))
        .json(&json!({ "videoId": "v1", "watchTimeSeconds": 10, "percentageWatched": 20.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous_watch.status().as_u16(), 200);

    let bad_percentage = app
        .client
        .post(app.url("/api/analytics/watch-time"))
        .json(&json!({ "videoId": "v1", "watchTimeSeconds": 10, "percentageWatched": 150.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_percentage.status().as_u16(), 400);
}
