// src/models/awards.rs

use serde::{Deserialize, Serialize};

use crate::models::video::VideoWithFilmmaker;

pub type LeaderboardEntry = VideoWithFilmmaker;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub category: Option<String>,
    pub timeframe: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyWinnersParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Leaderboard entry with its 1-based position.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyWinners {
    pub month: u32,
    pub year: i32,
    pub winners: Vec<RankedEntry>,
}

/// Awards of a single calendar year.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearAwards {
    pub year: i32,
    pub film_of_the_year: Option<LeaderboardEntry>,
    pub runner_ups: Vec<LeaderboardEntry>,
    pub student_filmmaker: Option<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HallOfFame {
    pub current_year: YearAwards,
    /// Newest first.
    pub past_years: Vec<YearAwards>,
}
