// src/models/analytics.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reporting window of the video analytics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Week,
    Month,
    Year,
}

impl Timeframe {
    /// Unknown values fall back to a month.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "week" => Timeframe::Week,
            "year" => Timeframe::Year,
            _ => Timeframe::Month,
        }
    }

    pub fn days(self) -> u32 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Year => 365,
        }
    }
}

/// One day of the synthetic series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub views: u64,
    pub unique_viewers: u64,
    /// Seconds.
    pub average_watch_time: u32,
    /// Percent.
    pub completion_rate: u32,
    pub shares: u64,
    pub ratings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTotals {
    pub views: u64,
    pub unique_viewers: u64,
    pub shares: u64,
    pub ratings: u64,
    pub average_watch_time: f64,
    pub average_completion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    pub name: &'static str,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Demographics {
    pub locations: Vec<Breakdown>,
    pub devices: Vec<Breakdown>,
    pub referrers: Vec<Breakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalytics {
    pub video_id: String,
    pub timeframe: String,
    pub totals: VideoTotals,
    pub daily_data: Vec<SeriesPoint>,
    pub demographics: Demographics,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVideo {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionShare {
    pub region: &'static str,
    pub percentage: u32,
}

/// Dashboard summary for the requesting filmmaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmmakerAnalytics {
    pub total_views: u64,
    pub total_videos: usize,
    /// Seconds, from recorded watch events.
    pub total_watch_time: u64,
    pub average_rating: f64,
    pub total_shares: u64,
    pub total_ratings: u64,
    pub views_change: f64,
    pub shares_change: f64,
    pub rating_change: f64,
    pub top_videos: Vec<TopVideo>,
    pub views_by_day: Vec<SeriesPoint>,
    pub geographic_distribution: Vec<RegionShare>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchTimeRequest {
    pub video_id: String,
    pub watch_time_seconds: u64,
    pub percentage_watched: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchTimeEvent {
    pub video_id: String,
    pub user_id: Option<String>,
    pub seconds: u64,
    pub percentage: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub video_id: String,
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareEvent {
    pub share_id: String,
    pub video_id: String,
    pub platform: String,
    pub url: String,
    pub recorded_at: DateTime<Utc>,
}
