//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and passed down explicitly; nothing below `main`
//! reads the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Strava API base URL.
pub const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
/// Default location of the activities document served to the map.
pub const DEFAULT_ACTIVITIES_PATH: &str = "activities.json";
/// Activities requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Pause after every detail request.
pub const DEFAULT_DETAIL_DELAY_MS: u64 = 150;
/// Pause between listing pages.
pub const DEFAULT_PAGE_DELAY_MS: u64 = 500;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth access token (bearer)
    pub access_token: String,
    /// Strava API base URL
    pub api_url: String,
    /// Path of the persisted activities document
    pub activities_path: PathBuf,
    /// Listing page size
    pub page_size: u32,
    /// Delay after each detail fetch
    pub detail_delay: Duration,
    /// Delay between listing pages
    pub page_delay: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            access_token: "test_access_token".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            activities_path: PathBuf::from(DEFAULT_ACTIVITIES_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            detail_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Activities document path from `ACTIVITIES_PATH` (and `.env`), for
    /// commands that never talk to Strava.
    pub fn activities_path_from_env() -> PathBuf {
        dotenvy::dotenv().ok();
        Self::activities_path_from_lookup(|key| env::var(key).ok())
    }

    /// Activities document path from an arbitrary key lookup.
    pub fn activities_path_from_lookup<F>(lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("ACTIVITIES_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ACTIVITIES_PATH))
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup("STRAVA_ACCESS_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("STRAVA_ACCESS_TOKEN"))?;

        let api_url = lookup("STRAVA_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            access_token,
            api_url,
            activities_path: Self::activities_path_from_lookup(&lookup),
            page_size: lookup("STRAVA_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u32| n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            detail_delay: Duration::from_millis(
                lookup("STRAVA_DETAIL_DELAY_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_DETAIL_DELAY_MS),
            ),
            page_delay: Duration::from_millis(
                lookup("STRAVA_PAGE_DELAY_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PAGE_DELAY_MS),
            ),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
