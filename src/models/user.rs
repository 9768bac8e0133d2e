// src/models/user.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Subscription plan. Determines the upload quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subscription {
    Basic,
    Student,
    Pro,
    Elite,
}

/// Monthly upload allowance of a plan. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadQuota {
    pub max_uploads: Option<u32>,
    pub max_minutes: Option<u32>,
    pub max_minutes_per_video: Option<u32>,
}

impl Subscription {
    pub fn quota(self) -> UploadQuota {
        match self {
            Subscription::Basic | Subscription::Student => UploadQuota {
                max_uploads: Some(5),
                max_minutes: Some(50),
                max_minutes_per_video: None,
            },
            Subscription::Pro => UploadQuota {
                max_uploads: Some(15),
                max_minutes: Some(150),
                max_minutes_per_video: None,
            },
            Subscription::Elite => UploadQuota {
                max_uploads: None,
                max_minutes: None,
                max_minutes_per_video: Some(30),
            },
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Unique, used as the login key. Stored lowercase.
    pub email: String,

    pub name: String,

    /// Argon2 password hash.
    /// Skipped during serialization so it never reaches a response body.
    #[serde(skip)]
    pub password: String,

    pub is_student: bool,
    pub is_verified: bool,
    pub subscription: Subscription,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<BTreeMap<String, String>>,

    pub join_date: DateTime<Utc>,
}

impl User {
    /// A fresh account with no optional profile fields.
    pub fn new(id: String, email: String, name: String, password: String, is_student: bool) -> Self {
        Self {
            id,
            email,
            name,
            password,
            is_student,
            // Students stay unverified until they confirm their school code.
            is_verified: !is_student,
            subscription: Subscription::Basic,
            bio: None,
            location: None,
            profile_picture: None,
            school: None,
            social_links: None,
            join_date: Utc::now(),
        }
    }
}

/// Denormalized owner info embedded in video and leaderboard responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmmakerSummary {
    pub id: String,
    pub name: String,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_student: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

impl FilmmakerSummary {
    /// Placeholder for videos whose owner record is gone.
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: "Unknown filmmaker".to_string(),
            is_verified: false,
            is_student: None,
            school: None,
        }
    }
}

impl From<&User> for FilmmakerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            is_verified: user.is_verified,
            is_student: user.is_student.then_some(true),
            school: user.school.clone(),
        }
    }
}

/// Form body of `POST /api/auth/login`. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name length must be between 1 and 100 characters."
    ))]
    pub name: String,
    #[serde(default)]
    pub is_student: bool,
}

#[derive(Debug, Deserialize)]
pub struct VerifyStudentRequest {
    pub email: String,
    pub code: String,
}

/// Returned by login and register.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub user: User,
}

/// Partial profile update.
///
/// A missing key leaves the field alone. For the optional fields an explicit
/// `null` clears the stored value; `name` ignores `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub profile_picture: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub school: Option<Option<String>>,
    /// Replaces the whole mapping, no merge.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub social_links: Option<Option<BTreeMap<String, String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryRequest {
    pub video_id: String,
    /// Fraction watched, 0.0 to 1.0.
    pub progress: f64,
}

/// One (user, video) progress record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    pub user_id: String,
    pub video_id: String,
    pub progress: f64,
    pub updated_at: DateTime<Utc>,
}
