// src/handlers/awards.rs

use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::awards::{LeaderboardParams, MonthlyWinnersParams},
    services::awards,
    state::AppState,
    utils::extract::AppQuery,
};

/// Top rated videos. `category=all` (the default) disables the filter.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = awards::leaderboard(
        state.videos.as_ref(),
        state.users.as_ref(),
        params.category.as_deref(),
        params.timeframe.as_deref().unwrap_or("month"),
        params.limit.unwrap_or(5),
    )
    .await?;

    Ok(Json(entries))
}

pub async fn get_hall_of_fame(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let hall = awards::hall_of_fame(state.videos.as_ref(), state.users.as_ref(), Utc::now()).await?;
    Ok(Json(hall))
}

pub async fn get_monthly_winners(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<MonthlyWinnersParams>,
) -> Result<impl IntoResponse, AppError> {
    let winners = awards::monthly_winners(
        state.videos.as_ref(),
        state.users.as_ref(),
        params.month,
        params.year,
        Utc::now(),
    )
    .await?;

    Ok(Json(winners))
}
