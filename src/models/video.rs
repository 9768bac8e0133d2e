// src/models/video.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::FilmmakerSummary;

/// An entry of the fixed category catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category { id: "short-film", name: "Short Film" },
    Category { id: "commercial", name: "Commercial" },
    Category { id: "music-video", name: "Music Video" },
    Category { id: "indie-film", name: "Indie Film" },
    Category { id: "promotional", name: "Promotional Video" },
    Category { id: "event", name: "Event Highlight" },
];

pub fn is_known_category(id: &str) -> bool {
    CATEGORIES.iter().any(|c| c.id == id)
}

/// A stored video record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub owner_user_id: String,
    pub upload_date: DateTime<Utc>,
    /// Length in seconds.
    pub duration: u32,
    pub views: u64,
    /// Running mean of accepted ratings, 0 while `rating_count` is 0.
    pub average_rating: f64,
    pub rating_count: u64,
    pub shares: u64,
    pub thumbnail_url: Option<String>,
    pub video_url: String,
    pub is_public: bool,
    pub tags: Vec<String>,
}

/// A video joined with its owner's summary.
/// Also the shape of a leaderboard entry.
#[derive(Debug, Clone, Serialize)]
pub struct VideoWithFilmmaker {
    #[serde(flatten)]
    pub video: Video,
    pub filmmaker: FilmmakerSummary,
}

/// Splits the comma separated `tags` form field. Blank items are dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text fields of an upload, collected from the multipart form.
#[derive(Debug, Clone, Validate)]
pub struct UploadMetadata {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 chars"))]
    pub title: String,
    #[validate(length(max = 5000, message = "Description must be at most 5000 chars"))]
    pub description: String,
    #[validate(custom(function = validate_category))]
    pub category: String,
    pub is_public: bool,
    pub tags: Vec<String>,
    /// Seconds, as reported by the client.
    pub duration: u32,
}

/// A file part of an upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Lowercase extension of the original file name, if it looks sane.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        let valid = !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| ext.to_ascii_lowercase())
    }
}

/// Partial update of a video. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
    /// `null` removes the thumbnail.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub thumbnail_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub average_rating: f64,
    pub rating_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct RateParams {
    pub rating: Option<f64>,
}

/// Query parameters for `GET /api/videos`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub timeframe: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub limit: Option<i64>,
}

fn validate_category(category: &str) -> Result<(), validator::ValidationError> {
    if !is_known_category(category) {
        return Err(validator::ValidationError::new("unknown_category"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_split_and_trimmed() {
        assert_eq!(parse_tags("nature, cinematic ,4k"), vec!["nature", "cinematic", "4k"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn extension_rejects_odd_names() {
        let file = |name: &str| UploadFile { file_name: Some(name.to_string()), bytes: vec![] };
        assert_eq!(file("clip.MP4").extension().as_deref(), Some("mp4"));
        assert_eq!(file("noext").extension(), None);
        assert_eq!(file("x.../../etc").extension(), None);
    }
}
