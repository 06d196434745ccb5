// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Normalized activity record as persisted for the map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A (latitude, longitude) pair in degrees.
pub type LatLng = (f64, f64);

/// One fitness activity as stored in the activities document.
///
/// Field names match the JSON consumed by the browser map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Strava activity ID (unique within the collection)
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Primary activity type (Ride, Run, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Sport subtype (MountainBikeRide, TrailRun, ...)
    pub sport_type: String,
    /// Start date/time (UTC)
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    pub elapsed_time: u64,
    /// Elevation gain in meters
    pub total_elevation_gain: f64,
    #[serde(default, deserialize_with = "empty_latlng_as_none")]
    pub start_latlng: Option<LatLng>,
    #[serde(default, deserialize_with = "empty_latlng_as_none")]
    pub end_latlng: Option<LatLng>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    /// Encoded polyline from the activity detail
    pub map_polyline: Option<String>,
    /// Decoded track, empty when there is no usable polyline
    #[serde(default)]
    pub coordinates: Vec<LatLng>,
}

impl ActivityRecord {
    /// Whether this activity carries a drawable GPS track.
    pub fn has_coordinates(&self) -> bool {
        !self.coordinates.is_empty()
    }
}

/// Older documents store `""` for a missing start date.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}

/// Older documents keep Strava's `[]` for activities without GPS.
fn empty_latlng_as_none<'de, D>(deserializer: D) -> Result<Option<LatLng>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<f64>>::deserialize(deserializer)?.as_deref() {
        Some([lat, lng]) => Ok(Some((*lat, *lng))),
        Some([]) | None => Ok(None),
        Some(other) => Err(serde::de::Error::invalid_length(
            other.len(),
            &"an empty list or a latitude/longitude pair",
        )),
    }
}
