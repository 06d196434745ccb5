//! Summary statistics over the local activity collection.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::ActivityRecord;

/// Aggregates printed by the `stats` command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityStats {
    /// Number of activities
    pub total_activities: usize,
    /// Total distance (meters)
    pub total_distance_meters: f64,
    /// Total moving time (seconds)
    pub total_moving_seconds: u64,
    /// Activity count per sport type
    pub activities_by_sport: HashMap<String, usize>,
    /// Activities with a decoded GPS track
    pub with_coordinates: usize,
    /// Earliest start date
    pub oldest: Option<DateTime<Utc>>,
    /// Latest start date
    pub newest: Option<DateTime<Utc>>,
}

impl ActivityStats {
    /// Compute statistics for a collection of records.
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let mut stats = Self::default();

        for record in records {
            stats.total_activities += 1;
            stats.total_distance_meters += record.distance;
            stats.total_moving_seconds += record.moving_time;

            let sport = if record.sport_type.is_empty() {
                &record.activity_type
            } else {
                &record.sport_type
            };
            *stats.activities_by_sport.entry(sport.clone()).or_insert(0) += 1;

            if record.has_coordinates() {
                stats.with_coordinates += 1;
            }

            if let Some(start) = record.start_date {
                stats.oldest = Some(stats.oldest.map_or(start, |d| d.min(start)));
                stats.newest = Some(stats.newest.map_or(start, |d| d.max(start)));
            }
        }

        stats
    }

    /// Total distance in kilometers.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }

    /// Total moving time in hours.
    pub fn total_moving_hours(&self) -> f64 {
        self.total_moving_seconds as f64 / 3600.0
    }

    /// Sport types ordered by count (descending), then name.
    pub fn sports_by_count(&self) -> Vec<(&str, usize)> {
        let mut sports: Vec<(&str, usize)> = self
            .activities_by_sport
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        sports.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sports
    }
}
