// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{analytics, auth, awards, health, users, videos},
    state::AppState,
    utils::jwt::require_auth,
};

/// Builds the CORS layer from the configured origins. Unparsable origins are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Assembles the main application router.
///
/// * Nests one sub-router per API prefix.
/// * Routes that need a caller either sit behind `require_auth` or take an
///   `AuthUser` extractor.
/// * Serves uploaded files under `/media`.
/// * Applies global middleware (Trace, CORS) and injects the state.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let auth_layer = middleware::from_fn_with_state(state.clone(), require_auth);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/verify-student", post(auth::verify_student));

    let video_routes = Router::new()
        .route("/", get(videos::list_videos))
        .route("/featured", get(videos::featured_videos))
        .route("/popular", get(videos::popular_videos))
        .route("/categories", get(videos::list_categories))
        .route("/search", get(videos::search_videos))
        .route(
            "/upload",
            post(videos::upload_video)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes())),
        )
        .route(
            "/{id}",
            get(videos::get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/{id}/rate", post(videos::rate_video))
        .route("/{id}/view", post(videos::record_view));

    let user_routes = Router::new()
        .route("/profile/{id}", get(users::get_profile))
        // Protected user routes
        .merge(
            Router::new()
                .route("/profile", get(users::get_me).put(users::update_me))
                .route(
                    "/history",
                    get(users::list_history).post(users::record_history),
                )
                .route_layer(auth_layer.clone()),
        );

    let award_routes = Router::new()
        .route("/leaderboard", get(awards::get_leaderboard))
        .route("/hall-of-fame", get(awards::get_hall_of_fame))
        .route("/monthly-winners", get(awards::get_monthly_winners));

    let analytics_routes = Router::new()
        .route("/video/{id}", get(analytics::get_video_analytics))
        .route("/watch-time", post(analytics::record_watch_time))
        .route("/shares", post(analytics::record_share))
        .merge(
            Router::new()
                .route("/filmmaker", get(analytics::get_filmmaker_analytics))
                .route_layer(auth_layer),
        );

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/videos", video_routes)
        .nest("/api/users", user_routes)
        .nest("/api/awards", award_routes)
        .nest("/api/analytics", analytics_routes)
        .route("/api/health", get(health::health_check))
        .nest_service("/media", ServeDir::new(&state.config.upload_dir))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
