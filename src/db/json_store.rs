// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON document store for activity records.
//!
//! The whole collection lives in one pretty-printed JSON array that the map
//! page loads directly. Every save rewrites the document in full.

use crate::error::{AppError, Result};
use crate::models::ActivityRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed activity collection.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    path: PathBuf,
}

impl ActivityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the activities document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<ActivityRecord>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No activities file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let records: Vec<ActivityRecord> = serde_json::from_str(&data).map_err(|e| {
            AppError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Loaded activities");
        Ok(records)
    }

    /// Replace the stored collection.
    ///
    /// Writes a sibling temporary file and renames it over the document.
    pub fn save(&self, records: &[ActivityRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut json = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::Storage(format!("Failed to serialize activities: {}", e)))?;
        json.push('\n');

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::info!(path = %self.path.display(), count = records.len(), "Saved activities");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "activities.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_path_is_sibling() {
        let store = ActivityStore::new("/data/activities.json");
        assert_eq!(store.tmp_path(), PathBuf::from("/data/activities.json.tmp"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ActivityStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ActivityStore::new(&path).load().unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        // Left untouched
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = ActivityStore::new(dir.path().join("nested/out/activities.json"));
        store.save(&[]).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]\n");
        assert!(!store.tmp_path().exists());
    }
}
