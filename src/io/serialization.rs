// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tracking result deserialization.
//!
//! This module handles importing the per-frame detection dataset written by
//! the tracking backend, in JSON or YAML form.

use crate::models::track::TrackDataset;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Import tracks from JSON format.
pub fn import_json(path: &Path) -> Result<TrackDataset> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let data = serde_json::from_str(&json)
        .with_context(|| format!("invalid tracks JSON in {}", path.display()))?;
    Ok(data)
}

/// Import tracks from YAML format.
pub fn import_yaml(path: &Path) -> Result<TrackDataset> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    let data = serde_yaml::from_str(&yaml)
        .with_context(|| format!("invalid tracks YAML in {}", path.display()))?;
    Ok(data)
}

/// Import tracks, picking the format from the file extension.
pub fn import_tracks(path: &Path) -> Result<TrackDataset> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    let data = match extension.as_deref() {
        Some("json") => import_json(path)?,
        Some("yaml") | Some("yml") => import_yaml(path)?,
        _ => bail!("Unsupported tracks file extension: {:?}", extension),
    };
    log::info!(
        "Imported {} frames ({} track IDs) from {}",
        data.frames.len(),
        data.track_ids().len(),
        path.display()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "headhuntr-preview-{}-{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_import_json_by_extension() {
        let path = temp_file(
            "tracks.json",
            r#"{"video": {"fps": 15.0}, "frames": [{"f": 0, "dets": [{"id": 1, "bbox": [0, 0, 4, 4]}]}]}"#,
        );
        let data = import_tracks(&path).unwrap();
        assert_eq!(data.fps(), 15.0);
        assert_eq!(data.frames[0].dets[0].id, 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_import_yaml_by_extension() {
        let path = temp_file(
            "tracks.YML",
            "video:\n  fps: 24\nframes:\n  - dets:\n      - id: 5\n        bbox: [1, 2, 3, 4]\n  - dets: []\n",
        );
        let data = import_tracks(&path).unwrap();
        assert_eq!(data.fps(), 24.0);
        assert_eq!(data.frames.len(), 2);
        assert_eq!(data.frames[0].dets[0].bbox, [1.0, 2.0, 3.0, 4.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_unsupported_extension() {
        let path = temp_file("tracks.csv", "id,x1,y1,x2,y2\n");
        assert!(import_tracks(&path).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = std::env::temp_dir().join("headhuntr-preview-does-not-exist.json");
        let err = import_tracks(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed reading"));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let path = temp_file("broken.json", r#"{"frames": [{"dets": [{"id": "x"}]}]}"#);
        assert!(import_tracks(&path).is_err());
        std::fs::remove_file(path).ok();
    }
}
