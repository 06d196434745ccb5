// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod fetcher;
pub mod polyline;
pub mod strava;
pub mod sync;

pub use activity::normalize;
pub use fetcher::{ActivitySource, Page, PageCursor, Throttle};
pub use strava::StravaClient;
pub use sync::{SyncMode, SyncReport, SyncStatus, Synchronizer};
