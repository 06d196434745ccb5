// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Incremental activity synchronization.
//!
//! Handles the core workflow:
//! 1. Load the local collection and index known activity IDs
//! 2. Validate credentials before anything is written
//! 3. Walk listing pages after the resume cutoff (or all history)
//! 4. Fetch details for unknown activities and normalize them
//! 5. Merge, sort newest first and persist
//!
//! A rate-limit response at any call site stops fetching immediately; the
//! records gathered so far are persisted and the run reports `Throttled`.

use crate::config::Config;
use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::ActivityRecord;
use crate::services::activity::normalize;
use crate::services::fetcher::{ActivitySource, PageCursor, Throttle};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Log progress every this many new activities.
const PROGRESS_INTERVAL: usize = 10;

/// Where a run starts fetching from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Only activities after the newest local one.
    Incremental,
    /// Walk the whole history, filling in anything missing locally.
    Full,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Listing exhausted.
    Completed,
    /// Stopped by a rate limit; partial progress saved.
    Throttled,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub mode: SyncMode,
    pub status: SyncStatus,
    /// Start cutoff used for the listing (`None` = full history)
    pub cutoff: Option<DateTime<Utc>>,
    /// Activities in the local collection before the run
    pub existing_activities: usize,
    /// Activities added by this run
    pub new_activities: usize,
    /// Added activities that have a decoded track
    pub new_with_coordinates: usize,
    /// Listed activities skipped because they were already known
    pub skipped_known: usize,
    /// Detail fetches that failed and were skipped
    pub failed_details: usize,
    /// Listing pages processed
    pub pages: u32,
    /// Activities in the collection after the run
    pub total_activities: usize,
    /// Activities in the collection with a decoded track
    pub total_with_coordinates: usize,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.status == SyncStatus::Completed
    }
}

/// Synchronizes the local collection with the remote service.
pub struct Synchronizer<'a, S: ActivitySource + ?Sized> {
    source: &'a S,
    store: &'a ActivityStore,
    page_size: u32,
    throttle: Throttle,
}

impl<'a, S: ActivitySource + ?Sized> Synchronizer<'a, S> {
    pub fn new(source: &'a S, store: &'a ActivityStore, config: &Config) -> Self {
        Self {
            source,
            store,
            page_size: config.page_size,
            throttle: Throttle::from_config(config),
        }
    }

    /// Run one sync.
    ///
    /// Errors only for fatal problems (unreadable store, bad credentials,
    /// listing failures other than throttling). Throttling at any call site,
    /// the credential check included, is a successful partial run.
    pub async fn run(&self, mode: SyncMode) -> Result<SyncReport> {
        let existing = self.store.load()?;
        let mut known: HashSet<u64> = existing.iter().map(|r| r.id).collect();

        let cutoff = match mode {
            SyncMode::Incremental => resume_cutoff(&existing),
            SyncMode::Full => None,
        };

        let mut report = SyncReport {
            mode,
            status: SyncStatus::Completed,
            cutoff,
            existing_activities: existing.len(),
            new_activities: 0,
            new_with_coordinates: 0,
            skipped_known: 0,
            failed_details: 0,
            pages: 0,
            total_activities: existing.len(),
            total_with_coordinates: existing.iter().filter(|r| r.has_coordinates()).count(),
        };

        // Fails before any state is touched
        let athlete = match self.source.athlete().await {
            Ok(athlete) => athlete,
            Err(AppError::RateLimited) => {
                tracing::warn!("Rate limited while validating credentials");
                report.status = SyncStatus::Throttled;
                return Ok(report);
            }
            Err(e) => return Err(e),
        };
        tracing::info!(
            athlete_id = athlete.id,
            athlete = %athlete.display_name(),
            existing = existing.len(),
            "Starting activity sync"
        );
        match cutoff {
            Some(ts) => tracing::info!(after = %format_utc_rfc3339(ts), "Fetching activities after latest local activity"),
            None => tracing::info!("Fetching activities from the beginning of history"),
        }

        let mut new_records: Vec<ActivityRecord> = Vec::new();
        let mut cursor = PageCursor::new(
            self.source,
            cutoff.map(|ts| ts.timestamp()),
            self.page_size,
            self.throttle,
        );

        let status = 'pages: loop {
            let page = match cursor.next_page().await {
                None => break SyncStatus::Completed,
                Some(Ok(page)) => page,
                Some(Err(AppError::RateLimited)) => {
                    tracing::warn!(page = report.pages + 1, "Rate limited while listing activities");
                    break SyncStatus::Throttled;
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, page = report.pages + 1, "Failed to list activities");
                    self.persist_partial(existing, new_records)?;
                    return Err(e);
                }
            };

            report.pages += 1;
            tracing::info!(
                page = page.number,
                count = page.activities.len(),
                "Processing activity page"
            );

            for summary in &page.activities {
                if known.contains(&summary.id) {
                    report.skipped_known += 1;
                    continue;
                }

                match self.source.get_activity(summary.id).await {
                    Ok(detail) => {
                        let record = normalize(summary, &detail);
                        tracing::debug!(
                            activity_id = record.id,
                            name = %record.name,
                            sport_type = %record.sport_type,
                            points = record.coordinates.len(),
                            "Synced activity"
                        );
                        known.insert(record.id);
                        new_records.push(record);

                        if new_records.len() % PROGRESS_INTERVAL == 0 {
                            tracing::info!(new_activities = new_records.len(), "Sync progress");
                        }
                    }
                    Err(AppError::RateLimited) => {
                        tracing::warn!(
                            activity_id = summary.id,
                            "Rate limited while fetching activity details"
                        );
                        break 'pages SyncStatus::Throttled;
                    }
                    Err(AppError::Unauthorized) => {
                        self.persist_partial(existing, new_records)?;
                        return Err(AppError::Unauthorized);
                    }
                    Err(e) => {
                        tracing::warn!(
                            activity_id = summary.id,
                            error = %e,
                            "Could not fetch activity details, skipping"
                        );
                        report.failed_details += 1;
                    }
                }

                self.throttle.after_detail().await;
            }
        };

        report.status = status;
        report.new_activities = new_records.len();
        report.new_with_coordinates = new_records.iter().filter(|r| r.has_coordinates()).count();

        let merged = merge_records(existing, new_records);
        self.store.save(&merged)?;

        report.total_activities = merged.len();
        report.total_with_coordinates = merged.iter().filter(|r| r.has_coordinates()).count();

        tracing::info!(
            status = ?report.status,
            new_activities = report.new_activities,
            total = report.total_activities,
            "Activity sync finished"
        );
        Ok(report)
    }

    /// Save buffered records before a fatal error propagates.
    fn persist_partial(
        &self,
        existing: Vec<ActivityRecord>,
        new_records: Vec<ActivityRecord>,
    ) -> Result<()> {
        if new_records.is_empty() {
            return Ok(());
        }
        tracing::info!(count = new_records.len(), "Saving partial progress");
        self.store.save(&merge_records(existing, new_records))
    }
}

/// Resume point for an incremental sync: the newest known start date.
pub fn resume_cutoff(records: &[ActivityRecord]) -> Option<DateTime<Utc>> {
    records.iter().filter_map(|r| r.start_date).max()
}

/// Merge new records into the collection and sort newest first.
///
/// The first record seen for an ID wins, so existing records are never
/// replaced.
pub fn merge_records(
    existing: Vec<ActivityRecord>,
    new_records: Vec<ActivityRecord>,
) -> Vec<ActivityRecord> {
    let mut seen = HashSet::with_capacity(existing.len() + new_records.len());
    let mut merged: Vec<ActivityRecord> = existing
        .into_iter()
        .chain(new_records)
        .filter(|r| seen.insert(r.id))
        .collect();
    sort_newest_first(&mut merged);
    merged
}

/// Sort by start date descending; ties by ID descending, undated last.
pub fn sort_newest_first(records: &mut [ActivityRecord]) {
    records.sort_by(|a, b| match b.start_date.cmp(&a.start_date) {
        Ordering::Equal => b.id.cmp(&a.id),
        other => other,
    });
}
