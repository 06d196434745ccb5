// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Throttling and expired credentials are distinct variants so callers can
//! match on them instead of inspecting error text.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Strava rate limit reached (HTTP 429)")]
    RateLimited,

    #[error("Strava rejected the access token (HTTP 401)")]
    Unauthorized,

    #[error("Strava API error: HTTP {status}: {body}")]
    StravaApi { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode Strava response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// True when the remote service asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited)
    }

    /// True when the access token is missing, expired or revoked.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => AppError::RateLimited,
            401 => AppError::Unauthorized,
            _ => AppError::StravaApi { status, body },
        }
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
