// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities.
//!
//! Handles:
//! - Paginated activity listing (optionally after a cutoff)
//! - Activity detail fetching for polylines
//! - Athlete lookup (used to validate credentials before a sync)
//! - Rate limit detection from the HTTP status

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::fetcher::ActivitySource;
use async_trait::async_trait;
use serde::Deserialize;

/// Strava API client bound to a single access token.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StravaClient {
    /// Create a new Strava client from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// Get the authenticated athlete profile.
    pub async fn get_athlete(&self) -> Result<StravaAthlete> {
        let url = format!("{}/athlete", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// List the athlete's activities, newest first (paginated).
    pub async fn list_activities(
        &self,
        after: Option<i64>, // Unix timestamp
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let mut query = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        self.get_json(&url, &query).await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<StravaActivity> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, &[]).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Strava rate limit hit (429)");
            }

            return Err(AppError::from_status(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ActivitySource for StravaClient {
    async fn athlete(&self) -> Result<StravaAthlete> {
        self.get_athlete().await
    }

    async fn list_activities(
        &self,
        after: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>> {
        StravaClient::list_activities(self, after, page, per_page).await
    }

    async fn get_activity(&self, activity_id: u64) -> Result<StravaActivity> {
        StravaClient::get_activity(self, activity_id).await
    }
}

/// Summary activity from the list endpoint.
///
/// Everything except the ID is optional; missing values are defaulted when
/// the record is normalized.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub sport_type: Option<String>,
    pub start_date: Option<String>,
    pub distance: Option<f64>,
    pub moving_time: Option<u64>,
    pub elapsed_time: Option<u64>,
    pub total_elevation_gain: Option<f64>,
    /// `[lat, lng]`, or empty when the activity has no GPS
    pub start_latlng: Option<Vec<f64>>,
    pub end_latlng: Option<Vec<f64>>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
}

/// Detailed Strava activity response (only the parts we use).
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivity {
    pub id: u64,
    pub map: Option<StravaMap>,
}

impl StravaActivity {
    /// Get the detailed polyline, falling back to summary if not available.
    pub fn get_polyline(&self) -> Option<&str> {
        let map = self.map.as_ref()?;
        map.polyline
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(map.summary_polyline.as_deref().filter(|p| !p.is_empty()))
    }
}

/// Activity map data with polylines.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaMap {
    pub polyline: Option<String>,
    pub summary_polyline: Option<String>,
}

/// Authenticated athlete profile.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl StravaAthlete {
    /// "First Last", skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_polyline_prefers_detailed() {
        let activity: StravaActivity = serde_json::from_value(json!({
            "id": 1,
            "map": { "polyline": "abc", "summary_polyline": "xyz" }
        }))
        .unwrap();
        assert_eq!(activity.get_polyline(), Some("abc"));
    }

    #[test]
    fn test_get_polyline_falls_back_to_summary() {
        let activity: StravaActivity = serde_json::from_value(json!({
            "id": 1,
            "map": { "polyline": "", "summary_polyline": "xyz" }
        }))
        .unwrap();
        assert_eq!(activity.get_polyline(), Some("xyz"));
    }

    #[test]
    fn test_get_polyline_without_map() {
        let activity: StravaActivity = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!(activity.get_polyline(), None);
    }

    #[test]
    fn test_summary_tolerates_missing_fields() {
        let summary: StravaActivitySummary =
            serde_json::from_value(json!({ "id": 42, "name": null })).unwrap();
        assert_eq!(summary.id, 42);
        assert!(summary.name.is_none());
        assert!(summary.distance.is_none());
    }

    #[test]
    fn test_athlete_display_name() {
        let athlete: StravaAthlete =
            serde_json::from_value(json!({ "id": 7, "firstname": "Ada", "lastname": null }))
                .unwrap();
        assert_eq!(athlete.display_name(), "Ada");
    }
}
