// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated activity fetching.
//!
//! `PageCursor` walks the listing endpoint one page at a time and finishes at
//! the first empty page or the first error. All requests are sequential; the
//! fixed delays in `Throttle` keep a single run well under Strava's budget.

use crate::config::Config;
use crate::error::Result;
use crate::services::strava::{StravaActivity, StravaActivitySummary, StravaAthlete};
use async_trait::async_trait;
use std::time::Duration;

/// Read-only view of the remote activity service.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Authenticated athlete (cheap credential check).
    async fn athlete(&self) -> Result<StravaAthlete>;

    /// One page of activity summaries; an empty page means no more data.
    async fn list_activities(
        &self,
        after: Option<i64>,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>>;

    /// Full activity detail (carries the polyline).
    async fn get_activity(&self, activity_id: u64) -> Result<StravaActivity>;
}

/// Fixed pauses between requests.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    pub detail_delay: Duration,
    pub page_delay: Duration,
}

impl Throttle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            detail_delay: config.detail_delay,
            page_delay: config.page_delay,
        }
    }

    /// Pause after a detail request.
    pub async fn after_detail(&self) {
        pause(self.detail_delay).await;
    }

    /// Pause before requesting the next page.
    pub async fn between_pages(&self) {
        pause(self.page_delay).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// One non-empty page of the activity listing.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub activities: Vec<StravaActivitySummary>,
}

/// Lazy, finite sequence of listing pages.
///
/// Once it has yielded an error or hit an empty page it stays finished.
pub struct PageCursor<'a, S: ActivitySource + ?Sized> {
    source: &'a S,
    after: Option<i64>,
    per_page: u32,
    next_page: u32,
    throttle: Throttle,
    finished: bool,
}

impl<'a, S: ActivitySource + ?Sized> PageCursor<'a, S> {
    pub fn new(source: &'a S, after: Option<i64>, per_page: u32, throttle: Throttle) -> Self {
        Self {
            source,
            after,
            per_page,
            next_page: 1,
            throttle,
            finished: false,
        }
    }

    /// Fetch the next page.
    ///
    /// Returns `None` when the listing is exhausted, `Some(Err(_))` once on
    /// failure (including throttling).
    pub async fn next_page(&mut self) -> Option<Result<Page>> {
        if self.finished {
            return None;
        }

        if self.next_page > 1 {
            self.throttle.between_pages().await;
        }

        let number = self.next_page;
        match self
            .source
            .list_activities(self.after, number, self.per_page)
            .await
        {
            Ok(activities) if activities.is_empty() => {
                tracing::debug!(page = number, "Reached end of activities");
                self.finished = true;
                None
            }
            Ok(activities) => {
                self.next_page += 1;
                Some(Ok(Page { number, activities }))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }

    /// Whether the cursor has yielded its last item.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
