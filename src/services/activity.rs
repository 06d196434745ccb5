// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mapping of raw Strava activities into stored records.
//!
//! Listing fields come from the summary; the track comes from the detail's
//! map. Missing values are defaulted and never cause an error.

use crate::models::{ActivityRecord, LatLng};
use crate::services::polyline;
use crate::services::strava::{StravaActivity, StravaActivitySummary};
use crate::time_utils::parse_rfc3339_utc;

/// Build a record from a listing summary and its detail.
pub fn normalize(summary: &StravaActivitySummary, detail: &StravaActivity) -> ActivityRecord {
    let activity_type = summary.activity_type.clone().unwrap_or_default();
    let sport_type = summary
        .sport_type
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| activity_type.clone());

    let map_polyline = detail.get_polyline().map(str::to_string);
    let coordinates = map_polyline
        .as_deref()
        .map(polyline::decode_or_empty)
        .unwrap_or_default();

    if map_polyline.is_some() && coordinates.is_empty() {
        tracing::warn!(activity_id = summary.id, "Activity polyline could not be decoded");
    }

    ActivityRecord {
        id: summary.id,
        name: summary.name.clone().unwrap_or_default(),
        activity_type,
        sport_type,
        start_date: summary.start_date.as_deref().and_then(parse_rfc3339_utc),
        distance: summary.distance.unwrap_or(0.0).max(0.0),
        moving_time: summary.moving_time.unwrap_or(0),
        elapsed_time: summary.elapsed_time.unwrap_or(0),
        total_elevation_gain: summary.total_elevation_gain.unwrap_or(0.0),
        start_latlng: latlng_pair(summary.start_latlng.as_deref()),
        end_latlng: latlng_pair(summary.end_latlng.as_deref()),
        location_city: summary.location_city.clone(),
        location_state: summary.location_state.clone(),
        location_country: summary.location_country.clone(),
        map_polyline,
        coordinates,
    }
}

/// Strava sends `[]` for activities without GPS.
fn latlng_pair(value: Option<&[f64]>) -> Option<LatLng> {
    match value? {
        [lat, lng] => Some((*lat, *lng)),
        _ => None,
    }
}
