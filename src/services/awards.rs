//! Leaderboard, hall of fame and monthly winners.
//!
//! Rankings sort by `average_rating` descending with a stable sort, so ties
//! keep store (upload) order.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Utc};

use crate::{
    config::{MONTHLY_WINNER_COUNT, RUNNER_UP_COUNT},
    error::AppError,
    models::{
        awards::{HallOfFame, LeaderboardEntry, MonthlyWinners, RankedEntry, YearAwards},
        user::{FilmmakerSummary, User},
        video::Video,
    },
    services::videos::{category_matches, clamp_limit},
    store::{UserStore, VideoStore},
};

fn sort_by_rating(videos: &mut [Video]) {
    videos.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
}

async fn users_by_id(users: &dyn UserStore) -> Result<HashMap<String, User>, AppError> {
    Ok(users
        .list()
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect())
}

fn entry(video: Video, owners: &HashMap<String, User>) -> LeaderboardEntry {
    let filmmaker = owners
        .get(&video.owner_user_id)
        .map(FilmmakerSummary::from)
        .unwrap_or_else(|| FilmmakerSummary::unknown(&video.owner_user_id));
    LeaderboardEntry { video, filmmaker }
}

/// Top rated videos, optionally in one category. The timeframe does not narrow the set.
pub async fn leaderboard(
    videos: &dyn VideoStore,
    users: &dyn UserStore,
    category: Option<&str>,
    timeframe: &str,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    tracing::debug!("leaderboard requested for timeframe '{}'", timeframe);

    let mut candidates: Vec<Video> = videos
        .list()
        .await?
        .into_iter()
        .filter(|v| category_matches(category, &v.category))
        .collect();
    sort_by_rating(&mut candidates);
    candidates.truncate(clamp_limit(limit));

    let owners = users_by_id(users).await?;
    Ok(candidates.into_iter().map(|v| entry(v, &owners)).collect())
}

/// Awards for one year, from that year's uploads.
fn year_awards(year: i32, all: &[Video], owners: &HashMap<String, User>) -> YearAwards {
    let mut ranked: Vec<Video> = all
        .iter()
        .filter(|v| v.upload_date.year() == year)
        .cloned()
        .collect();
    sort_by_rating(&mut ranked);

    let student_filmmaker = ranked
        .iter()
        .find(|v| owners.get(&v.owner_user_id).is_some_and(|u| u.is_student))
        .cloned()
        .map(|v| entry(v, owners));

    let mut ranked = ranked.into_iter().map(|v| entry(v, owners));
    let film_of_the_year = ranked.next();
    let runner_ups = ranked.take(RUNNER_UP_COUNT).collect();

    YearAwards {
        year,
        film_of_the_year,
        runner_ups,
        student_filmmaker,
    }
}

pub async fn hall_of_fame(
    videos: &dyn VideoStore,
    users: &dyn UserStore,
    now: DateTime<Utc>,
) -> Result<HallOfFame, AppError> {
    let all = videos.list().await?;
    let owners = users_by_id(users).await?;
    let current = now.year();

    let past: BTreeSet<i32> = all
        .iter()
        .map(|v| v.upload_date.year())
        .filter(|year| *year < current)
        .collect();

    Ok(HallOfFame {
        current_year: year_awards(current, &all, &owners),
        past_years: past
            .into_iter()
            .rev()
            .map(|year| year_awards(year, &all, &owners))
            .collect(),
    })
}

/// Best rated uploads of a month, ranked from 1. Defaults to the current month.
pub async fn monthly_winners(
    videos: &dyn VideoStore,
    users: &dyn UserStore,
    month: Option<u32>,
    year: Option<i32>,
    now: DateTime<Utc>,
) -> Result<MonthlyWinners, AppError> {
    let month = month.unwrap_or_else(|| now.month());
    let year = year.unwrap_or_else(|| now.year());
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(format!("Invalid month {}", month)));
    }

    let mut candidates: Vec<Video> = videos
        .list()
        .await?
        .into_iter()
        .filter(|v| v.upload_date.year() == year && v.upload_date.month() == month)
        .collect();
    sort_by_rating(&mut candidates);
    candidates.truncate(MONTHLY_WINNER_COUNT);

    let owners = users_by_id(users).await?;
    let winners = candidates
        .into_iter()
        .enumerate()
        .map(|(i, v)| RankedEntry {
            rank: i + 1,
            entry: entry(v, &owners),
        })
        .collect();

    Ok(MonthlyWinners {
        month,
        year,
        winners,
    })
}
