// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use strava_world_map::config::Config;
use strava_world_map::error::{AppError, Result};
use strava_world_map::models::ActivityRecord;
use strava_world_map::services::strava::{StravaActivity, StravaActivitySummary, StravaAthlete};
use strava_world_map::services::ActivitySource;
use strava_world_map::time_utils::parse_rfc3339_utc;

/// Reference polyline with three points.
#[allow(dead_code)]
pub const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

/// Scripted reply for a detail request.
#[allow(dead_code)]
#[derive(Clone)]
pub enum DetailReply {
    Polyline(&'static str),
    NoMap,
    RateLimited,
    Status(u16),
}

/// In-memory Strava stand-in.
///
/// Pages are served in order; any page past the end is empty.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeStrava {
    pub pages: Vec<Vec<StravaActivitySummary>>,
    pub details: HashMap<u64, DetailReply>,
    /// Page number that answers 429
    pub throttle_page: Option<u32>,
    /// Page number that answers 500
    pub fail_page: Option<u32>,
    /// Athlete lookup answers 401
    pub reject_token: bool,
    /// Athlete lookup answers 429
    pub throttle_athlete: bool,
    pub list_calls: Mutex<Vec<(Option<i64>, u32, u32)>>,
    pub detail_calls: Mutex<Vec<u64>>,
}

#[allow(dead_code)]
impl FakeStrava {
    pub fn with_pages(pages: Vec<Vec<StravaActivitySummary>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn detail(mut self, id: u64, reply: DetailReply) -> Self {
        self.details.insert(id, reply);
        self
    }

    pub fn list_calls(&self) -> Vec<(Option<i64>, u32, u32)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivitySource for FakeStrava {
    async fn athlete(&self) -> Result<StravaAthlete> {
        if self.reject_token {
            return Err(AppError::from_status(401, "Authorization Error".to_string()));
        }
        if self.throttle_athlete {
            return Err(AppError::from_status(429, "Rate Limit Exceeded".to_string()));
        }
        Ok(serde_json::from_value(json!({
            "id": 1234,
            "firstname": "Test",
            "lastname": "Athlete"
        }))
        .unwrap())
    }

    async fn list_activities(
        &self,
        after: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>> {
        self.list_calls.lock().unwrap().push((after, page, per_page));

        if self.throttle_page == Some(page) {
            return Err(AppError::from_status(429, "Rate Limit Exceeded".to_string()));
        }
        if self.fail_page == Some(page) {
            return Err(AppError::from_status(500, "Internal Server Error".to_string()));
        }

        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_activity(&self, activity_id: u64) -> Result<StravaActivity> {
        self.detail_calls.lock().unwrap().push(activity_id);

        let reply = self
            .details
            .get(&activity_id)
            .cloned()
            .unwrap_or(DetailReply::Polyline(REFERENCE_POLYLINE));

        match reply {
            DetailReply::Polyline(p) => Ok(serde_json::from_value(json!({
                "id": activity_id,
                "map": { "polyline": p, "summary_polyline": null }
            }))
            .unwrap()),
            DetailReply::NoMap => Ok(serde_json::from_value(json!({ "id": activity_id })).unwrap()),
            DetailReply::RateLimited => Err(AppError::from_status(429, String::new())),
            DetailReply::Status(code) => Err(AppError::from_status(code, "boom".to_string())),
        }
    }
}

/// Listing summary as Strava would return it.
#[allow(dead_code)]
pub fn summary(id: u64, start_date: &str) -> StravaActivitySummary {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Activity {}", id),
        "type": "Ride",
        "sport_type": "GravelRide",
        "start_date": start_date,
        "distance": 12000.0,
        "moving_time": 2400,
        "elapsed_time": 2700,
        "total_elevation_gain": 150.0,
        "start_latlng": [37.4, -122.1],
        "end_latlng": [37.4, -122.1],
        "location_city": null,
        "location_state": null,
        "location_country": "United States"
    }))
    .unwrap()
}

/// Stored record with no track.
#[allow(dead_code)]
pub fn record(id: u64, start_date: &str) -> ActivityRecord {
    ActivityRecord {
        id,
        name: format!("Activity {}", id),
        activity_type: "Run".to_string(),
        sport_type: "TrailRun".to_string(),
        start_date: parse_rfc3339_utc(start_date),
        distance: 8000.0,
        moving_time: 2400,
        elapsed_time: 2500,
        total_elevation_gain: 200.0,
        start_latlng: None,
        end_latlng: None,
        location_city: None,
        location_state: None,
        location_country: None,
        map_polyline: None,
        coordinates: Vec::new(),
    }
}

/// Test config writing to the given path, no delays.
#[allow(dead_code)]
pub fn test_config(path: &std::path::Path) -> Config {
    Config {
        activities_path: path.to_path_buf(),
        ..Config::default()
    }
}
