//! Video and filmmaker analytics.
//!
//! Daily series are synthetic. Each one is drawn from an `StdRng` seeded by
//! (subject id, number of days, today), so the same request on the same day
//! returns the same numbers. Filmmaker totals aggregate the stored videos and
//! recorded watch events.

use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::analytics::{
        Breakdown, Demographics, FilmmakerAnalytics, RegionShare, SeriesPoint, ShareEvent,
        ShareRequest, Timeframe, TopVideo, VideoAnalytics, VideoTotals, WatchTimeEvent,
        WatchTimeRequest,
    },
    store::{EventStore, VideoStore},
};

const VIDEO_BASE_VIEWS: i64 = 300;
const FILMMAKER_BASE_VIEWS: i64 = 500;
const FILMMAKER_SERIES_DAYS: u32 = 30;
const TOP_VIDEO_COUNT: usize = 5;

const LOCATIONS: [Breakdown; 6] = [
    Breakdown { name: "United States", percentage: 45 },
    Breakdown { name: "United Kingdom", percentage: 15 },
    Breakdown { name: "Canada", percentage: 10 },
    Breakdown { name: "Germany", percentage: 8 },
    Breakdown { name: "France", percentage: 7 },
    Breakdown { name: "Other", percentage: 15 },
];

const DEVICES: [Breakdown; 4] = [
    Breakdown { name: "Mobile", percentage: 55 },
    Breakdown { name: "Desktop", percentage: 35 },
    Breakdown { name: "Tablet", percentage: 8 },
    Breakdown { name: "TV", percentage: 2 },
];

const REFERRERS: [Breakdown; 4] = [
    Breakdown { name: "Direct", percentage: 40 },
    Breakdown { name: "Social Media", percentage: 30 },
    Breakdown { name: "External Websites", percentage: 20 },
    Breakdown { name: "Search", percentage: 10 },
];

const REGIONS: [RegionShare; 4] = [
    RegionShare { region: "North America", percentage: 55 },
    RegionShare { region: "Europe", percentage: 25 },
    RegionShare { region: "Asia", percentage: 12 },
    RegionShare { region: "Other", percentage: 8 },
];

fn series_seed(subject: &str, days: u32, today: NaiveDate) -> u64 {
    let mut hasher = DefaultHasher::new();
    subject.hash(&mut hasher);
    days.hash(&mut hasher);
    today.hash(&mut hasher);
    hasher.finish()
}

/// `days` points ending at `today`, oldest first. Views trend upward towards today.
pub fn synthetic_series(subject: &str, days: u32, base_views: i64, today: NaiveDate) -> Vec<SeriesPoint> {
    let mut rng = StdRng::seed_from_u64(series_seed(subject, days, today));

    let mut points: Vec<SeriesPoint> = (0..days)
        .map(|days_ago| {
            let date = today
                .checked_sub_days(Days::new(u64::from(days_ago)))
                .unwrap_or(NaiveDate::MIN);
            let views = (base_views - i64::from(days_ago) + rng.gen_range(-20i64..=20)).max(0) as u64;
            SeriesPoint {
                date: date.format("%Y-%m-%d").to_string(),
                views,
                unique_viewers: views * 7 / 10,
                average_watch_time: rng.gen_range(40..=90),
                completion_rate: rng.gen_range(30..=80),
                shares: views / 20,
                ratings: views / 50,
            }
        })
        .collect();
    points.reverse();
    points
}

fn totals(series: &[SeriesPoint]) -> VideoTotals {
    let len = series.len().max(1) as f64;
    VideoTotals {
        views: series.iter().map(|p| p.views).sum(),
        unique_viewers: series.iter().map(|p| p.unique_viewers).sum(),
        shares: series.iter().map(|p| p.shares).sum(),
        ratings: series.iter().map(|p| p.ratings).sum(),
        average_watch_time: series.iter().map(|p| f64::from(p.average_watch_time)).sum::<f64>() / len,
        average_completion_rate: series.iter().map(|p| f64::from(p.completion_rate)).sum::<f64>()
            / len,
    }
}

pub async fn video_analytics(
    videos: &dyn VideoStore,
    video_id: &str,
    timeframe: &str,
    today: NaiveDate,
) -> Result<VideoAnalytics, AppError> {
    if videos.get(video_id).await?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let days = Timeframe::parse(timeframe).days();
    let daily_data = synthetic_series(video_id, days, VIDEO_BASE_VIEWS, today);

    Ok(VideoAnalytics {
        video_id: video_id.to_string(),
        timeframe: timeframe.to_string(),
        totals: totals(&daily_data),
        daily_data,
        demographics: Demographics {
            locations: LOCATIONS.to_vec(),
            devices: DEVICES.to_vec(),
            referrers: REFERRERS.to_vec(),
        },
    })
}

/// Percent change of the second half of `values` over the first half, one decimal.
fn half_over_half(values: &[u64]) -> f64 {
    let (previous, recent) = values.split_at(values.len() / 2);
    let previous: u64 = previous.iter().sum();
    let recent: u64 = recent.iter().sum();
    if previous == 0 {
        return 0.0;
    }
    let change = (recent as f64 - previous as f64) / previous as f64 * 100.0;
    (change * 10.0).round() / 10.0
}

pub async fn filmmaker_analytics(
    videos: &dyn VideoStore,
    events: &dyn EventStore,
    owner_id: &str,
    today: NaiveDate,
) -> Result<FilmmakerAnalytics, AppError> {
    let mut owned: Vec<_> = videos
        .list()
        .await?
        .into_iter()
        .filter(|v| v.owner_user_id == owner_id)
        .collect();

    let total_ratings: u64 = owned.iter().map(|v| v.rating_count).sum();
    let average_rating = if total_ratings == 0 {
        0.0
    } else {
        owned
            .iter()
            .map(|v| v.average_rating * v.rating_count as f64)
            .sum::<f64>()
            / total_ratings as f64
    };
    let ids: Vec<String> = owned.iter().map(|v| v.id.clone()).collect();
    let total_watch_time = events.total_watch_seconds(&ids).await?;

    let summary_views = owned.iter().map(|v| v.views).sum();
    let summary_shares = owned.iter().map(|v| v.shares).sum();
    let total_videos = owned.len();

    owned.sort_by(|a, b| b.views.cmp(&a.views));
    let top_videos = owned
        .into_iter()
        .take(TOP_VIDEO_COUNT)
        .map(|v| TopVideo {
            id: v.id,
            title: v.title,
            views: v.views,
            average_rating: v.average_rating,
        })
        .collect();

    let views_by_day = synthetic_series(owner_id, FILMMAKER_SERIES_DAYS, FILMMAKER_BASE_VIEWS, today);
    let views: Vec<u64> = views_by_day.iter().map(|p| p.views).collect();
    let shares: Vec<u64> = views_by_day.iter().map(|p| p.shares).collect();
    let ratings: Vec<u64> = views_by_day.iter().map(|p| p.ratings).collect();

    Ok(FilmmakerAnalytics {
        total_views: summary_views,
        total_videos,
        total_watch_time,
        average_rating,
        total_shares: summary_shares,
        total_ratings,
        views_change: half_over_half(&views),
        shares_change: half_over_half(&shares),
        rating_change: half_over_half(&ratings),
        top_videos,
        views_by_day,
        geographic_distribution: REGIONS.to_vec(),
    })
}

pub async fn record_watch_time(
    events: &dyn EventStore,
    user_id: Option<String>,
    request: WatchTimeRequest,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&request.percentage_watched) {
        return Err(AppError::BadRequest(
            "percentageWatched must be between 0 and 100".to_string(),
        ));
    }

    tracing::debug!(
        "Watch time {}s on {} ({:?})",
        request.watch_time_seconds,
        request.video_id,
        user_id
    );
    events
        .record_watch_time(WatchTimeEvent {
            video_id: request.video_id,
            user_id,
            seconds: request.watch_time_seconds,
            percentage: request.percentage_watched,
            recorded_at: now,
        })
        .await
}

/// Stores the share and bumps the video's counter. Returns the share id.
pub async fn record_share(
    videos: &dyn VideoStore,
    events: &dyn EventStore,
    request: ShareRequest,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    let share_id = format!("share_{}", Uuid::new_v4().simple());

    match videos
        .update_with(
            &request.video_id,
            Box::new(|v| {
                v.shares += 1;
                Ok(())
            }),
        )
        .await
    {
        Ok(_) | Err(AppError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    events
        .record_share(ShareEvent {
            share_id: share_id.clone(),
            video_id: request.video_id,
            platform: request.platform,
            url: request.url,
            recorded_at: now,
        })
        .await?;

    Ok(share_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::videos::tests::video,
        store::{MemoryEventStore, MemoryVideoStore},
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn series_is_deterministic_and_oldest_first() {
        let a = synthetic_series("v1", 7, 300, day());
        let b = synthetic_series("v1", 7, 300, day());
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
        assert_eq!(a.first().unwrap().date, "2024-06-09");
        assert_eq!(a.last().unwrap().date, "2024-06-15");
        assert!(a.iter().all(|p| (40..=90).contains(&p.average_watch_time)));
        assert!(a.iter().all(|p| (30..=80).contains(&p.completion_rate)));
        assert!(a.iter().all(|p| p.unique_viewers == p.views * 7 / 10));
    }

    #[test]
    fn half_over_half_handles_empty_history() {
        assert_eq!(half_over_half(&[0, 0, 10, 10]), 0.0);
        assert_eq!(half_over_half(&[10, 10, 15, 15]), 50.0);
    }

    #[tokio::test]
    async fn video_analytics_sizes_by_timeframe() {
        let videos = MemoryVideoStore::new();
        videos.insert(video("v1", "u1", "event", true)).await.unwrap();

        for (timeframe, days) in [("week", 7), ("month", 30), ("year", 365), ("decade", 30)] {
            let report = video_analytics(&videos, "v1", timeframe, day()).await.unwrap();
            assert_eq!(report.daily_data.len(), days);
            assert_eq!(
                report.totals.views,
                report.daily_data.iter().map(|p| p.views).sum::<u64>()
            );
        }

        let demographics = video_analytics(&videos, "v1", "week", day())
            .await
            .unwrap()
            .demographics;
        for group in [&demographics.locations, &demographics.devices, &demographics.referrers] {
            assert_eq!(group.iter().map(|b| b.percentage).sum::<u32>(), 100);
        }

        assert!(matches!(
            video_analytics(&videos, "missing", "week", day()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn filmmaker_totals_aggregate_owned_videos() {
        let videos = MemoryVideoStore::new();
        let events = MemoryEventStore::new();

        let mut a = video("a", "me", "event", true);
        a.views = 100;
        a.average_rating = 4.0;
        a.rating_count = 1;
        a.shares = 2;
        let mut b = video("b", "me", "event", false);
        b.views = 300;
        b.average_rating = 5.0;
        b.rating_count = 3;
        let mut other = video("c", "someone", "event", true);
        other.views = 1_000;
        for v in [a, b, other] {
            videos.insert(v).await.unwrap();
        }

        let watch = |video_id: &str, seconds| WatchTimeRequest {
            video_id: video_id.to_string(),
            watch_time_seconds: seconds,
            percentage_watched: 50.0,
        };
        record_watch_time(&events, None, watch("a", 40), Utc::now()).await.unwrap();
        record_watch_time(&events, None, watch("c", 99), Utc::now()).await.unwrap();

        let report = filmmaker_analytics(&videos, &events, "me", day()).await.unwrap();
        assert_eq!(report.total_videos, 2);
        assert_eq!(report.total_views, 400);
        assert_eq!(report.total_shares, 2);
        assert_eq!(report.total_ratings, 4);
        assert!((report.average_rating - 4.75).abs() < 1e-9);
        assert_eq!(report.total_watch_time, 40);
        assert_eq!(report.top_videos[0].id, "b");
        assert_eq!(report.views_by_day.len(), 30);
    }

    #[tokio::test]
    async fn watch_time_percentage_is_bounded() {
        let events = MemoryEventStore::new();
        let request = WatchTimeRequest {
            video_id: "v1".into(),
            watch_time_seconds: 10,
            percentage_watched: 120.0,
        };
        assert!(matches!(
            record_watch_time(&events, None, request, Utc::now()).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn share_bumps_known_videos_only() {
        let videos = MemoryVideoStore::new();
        let events = MemoryEventStore::new();
        videos.insert(video("v1", "u1", "event", true)).await.unwrap();

        let share = |video_id: &str| ShareRequest {
            video_id: video_id.to_string(),
            platform: "twitter".into(),
            url: "https://x.com/post".into(),
        };
        let id = record_share(&videos, &events, share("v1"), Utc::now()).await.unwrap();
        assert!(id.starts_with("share_"));
        record_share(&videos, &events, share("unknown"), Utc::now()).await.unwrap();

        assert_eq!(videos.get("v1").await.unwrap().unwrap().shares, 1);
    }
}
