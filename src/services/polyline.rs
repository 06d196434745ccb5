// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Encoded polyline decoding (Google polyline algorithm, precision 5).

use crate::models::LatLng;

/// Strava encodes coordinates with 1e-5 precision.
const STRAVA_PRECISION: u32 = 5;

/// Errors from polyline decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to decode polyline: {0}")]
    Malformed(String),
}

/// Decode an encoded polyline into (latitude, longitude) pairs.
pub fn decode(encoded: &str) -> Result<Vec<LatLng>, DecodeError> {
    let line = ::polyline::decode_polyline(encoded, STRAVA_PRECISION)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    Ok(line.0.into_iter().map(|c| (c.y, c.x)).collect())
}

/// Best-effort decode: malformed input yields an empty track.
pub fn decode_or_empty(encoded: &str) -> Vec<LatLng> {
    match decode(encoded) {
        Ok(coords) => coords,
        Err(e) => {
            tracing::debug!(error = %e, "Discarding undecodable polyline");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_decode_reference_polyline() {
        let coords = decode(REFERENCE).unwrap();
        assert_eq!(
            coords,
            vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
        );
    }

    #[test]
    fn test_decode_empty_string() {
        assert_eq!(decode("").unwrap(), Vec::<LatLng>::new());
    }

    #[test]
    fn test_decode_missing_longitude_is_error() {
        // Latitude of the second point without its longitude
        assert!(decode("_p~iF~ps|U_ulL").is_err());
    }

    #[test]
    fn test_decode_or_empty_on_invalid_characters() {
        assert!(decode_or_empty("  not a polyline  ").is_empty());
    }

    #[test]
    fn test_decode_or_empty_passes_through_valid_input() {
        assert_eq!(decode_or_empty(REFERENCE).len(), 3);
    }
}
