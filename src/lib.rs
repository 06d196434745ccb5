// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava World Map: keep a local copy of Strava activities for the map page.
//!
//! This crate fetches activities from the Strava API, decodes their
//! polylines and maintains a single JSON document of activity records,
//! newest first, that the browser map renders.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
