// src/config.rs

use std::{env, path::PathBuf, str::FromStr};

use dotenvy::dotenv;

/// Fallback signing secret. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "development_secret_key";

/// Issued tokens are valid for 24 hours unless JWT_EXPIRATION says otherwise.
pub const DEFAULT_JWT_EXPIRATION_SECS: u64 = 60 * 60 * 24;

pub const DEFAULT_VERIFICATION_CODE: &str = "123456";

/// Runner-ups listed per hall-of-fame year.
pub const RUNNER_UP_COUNT: usize = 3;

pub const MONTHLY_WINNER_COUNT: usize = 5;

/// Hard cap on any `limit` query parameter.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    /// Root directory of the local blob store.
    pub upload_dir: PathBuf,
    pub max_upload_size_mb: usize,
    pub cors_origins: Vec<String>,
    pub verification_code: String,
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: DEFAULT_JWT_EXPIRATION_SECS,
            rust_log: "info".to_string(),
            port: 8000,
            upload_dir: PathBuf::from("./uploads"),
            max_upload_size_mb: 500,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "https://vidorafilms.com".to_string(),
                "https://www.vidorafilms.com".to_string(),
            ],
            verification_code: DEFAULT_VERIFICATION_CODE.to_string(),
            seed_demo_data: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration),
            rust_log: env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            port: parse_var("PORT", defaults.port),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_size_mb: parse_var("MAX_UPLOAD_SIZE_MB", defaults.max_upload_size_mb),
            cors_origins,
            verification_code: env::var("STUDENT_VERIFICATION_CODE")
                .unwrap_or(defaults.verification_code),
            seed_demo_data: parse_var("SEED_DEMO_DATA", defaults.seed_demo_data),
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Reads `key` from the environment, keeping `default` when unset or unparsable.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
