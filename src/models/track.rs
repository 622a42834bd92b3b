// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tracking data structures.
//!
//! This module defines the per-frame detection dataset produced by the
//! tracking backend: boxes in intrinsic video pixels, each carrying a
//! persistent tracker ID, keyed by frame index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Frame rate used when the dataset does not carry a usable one.
pub const DEFAULT_FPS: f64 = 30.0;

/// Video metadata attached to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Number of frames the backend processed.
    #[serde(default, rename = "frames", skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<usize>,
}

impl VideoMeta {
    /// Frame rate to use for time-to-frame conversion. Falls back to
    /// [`DEFAULT_FPS`] when missing, non-finite or not positive.
    pub fn effective_fps(&self) -> f64 {
        match self.fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            _ => DEFAULT_FPS,
        }
    }

    /// Intrinsic frame size, if the backend reported a non-zero one.
    pub fn intrinsic_size(&self) -> Option<[u32; 2]> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some([w, h]),
            _ => None,
        }
    }
}

/// A single tracked subject in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: i64,
    /// `[x1, y1, x2, y2]` in intrinsic pixel space.
    pub bbox: [f64; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<f64>,
}

impl Detection {
    #[cfg(test)]
    pub fn new(id: i64, bbox: [f64; 4]) -> Self {
        Self { id, bbox, conf: None }
    }

    /// Box as an egui rect, with each axis ordered.
    ///
    /// Returns `None` if any coordinate is non-finite. Zero-area boxes are kept.
    pub fn rect(&self) -> Option<egui::Rect> {
        if !self.bbox.iter().all(|v| v.is_finite()) {
            return None;
        }
        let [x1, y1, x2, y2] = self.bbox;
        Some(egui::Rect::from_min_max(
            egui::pos2(x1.min(x2) as f32, y1.min(y2) as f32),
            egui::pos2(x1.max(x2) as f32, y1.max(y2) as f32),
        ))
    }

    /// Label drawn next to the box.
    pub fn label(&self) -> String {
        format!("ID {}", self.id)
    }
}

/// Detections for one frame index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, rename = "f", skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
    #[serde(default)]
    pub dets: Vec<Detection>,
}

impl Frame {
    #[cfg(test)]
    pub fn new(dets: Vec<Detection>) -> Self {
        Self { number: None, dets }
    }
}

/// Complete tracking result for one job.
///
/// `frames[i]` holds the detections for frame index `i`. Never mutated
/// after load; the overlay only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackDataset {
    #[serde(default)]
    pub video: VideoMeta,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl TrackDataset {
    #[cfg(test)]
    pub fn new(fps: f64, frames: Vec<Frame>) -> Self {
        Self {
            video: VideoMeta {
                fps: Some(fps),
                ..Default::default()
            },
            frames,
        }
    }

    pub fn fps(&self) -> f64 {
        self.video.effective_fps()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame index for a playback time: `floor(t * fps)`.
    ///
    /// NaN and negative times resolve to frame 0. The result may lie beyond
    /// the end of the data; see [`TrackDataset::resolve`].
    pub fn frame_index(&self, time: f64) -> usize {
        frame_index(time, self.fps())
    }

    /// Frame index for a playback time together with its data, if any.
    ///
    /// Indices at or past `frames.len()` resolve to `None`: nothing is drawn.
    pub fn resolve(&self, time: f64) -> (usize, Option<&Frame>) {
        let index = self.frame_index(time);
        (index, self.frames.get(index))
    }

    /// Length of the covered data in seconds.
    pub fn duration(&self) -> f64 {
        self.frames.len() as f64 / self.fps()
    }

    /// Distinct tracker IDs across the whole dataset.
    pub fn track_ids(&self) -> BTreeSet<i64> {
        self.frames
            .iter()
            .flat_map(|f| f.dets.iter().map(|d| d.id))
            .collect()
    }

    /// Whole-dataset counts. Walks every frame, so compute once per load.
    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            frames: self.frames.len(),
            detections: self.frames.iter().map(|f| f.dets.len()).sum(),
            track_ids: self.track_ids().len(),
        }
    }
}

/// Counts shown for a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSummary {
    pub frames: usize,
    pub detections: usize,
    pub track_ids: usize,
}

/// `floor(max(time, 0) * fps)`.
///
/// NaN and negative times resolve to 0. Times whose frame number does not
/// fit (including `+inf`) saturate to `usize::MAX`, which never has data.
pub fn frame_index(time: f64, fps: f64) -> usize {
    let scaled = (time.max(0.0) * fps).floor();
    if scaled.is_nan() {
        0
    } else if scaled >= usize::MAX as f64 {
        usize::MAX
    } else {
        scaled as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_fps_fallback() {
        let mut meta = VideoMeta::default();
        assert_eq!(meta.effective_fps(), DEFAULT_FPS);

        meta.fps = Some(0.0);
        assert_eq!(meta.effective_fps(), DEFAULT_FPS);

        meta.fps = Some(-12.0);
        assert_eq!(meta.effective_fps(), DEFAULT_FPS);

        meta.fps = Some(f64::NAN);
        assert_eq!(meta.effective_fps(), DEFAULT_FPS);

        meta.fps = Some(15.0);
        assert_eq!(meta.effective_fps(), 15.0);
    }

    #[test]
    fn test_frame_index_floor() {
        assert_eq!(frame_index(0.0, 30.0), 0);
        assert_eq!(frame_index(0.999 / 30.0, 30.0), 0);
        assert_eq!(frame_index(1.0 / 30.0 + 1e-9, 30.0), 1);
        assert_eq!(frame_index(1.0, 30.0), 30);
        assert_eq!(frame_index(2.5, 15.0), 37);
    }

    #[test]
    fn test_frame_index_degenerate_times() {
        assert_eq!(frame_index(-3.0, 30.0), 0);
        assert_eq!(frame_index(f64::NEG_INFINITY, 30.0), 0);
        assert_eq!(frame_index(f64::NAN, 30.0), 0);
    }

    #[test]
    fn test_frame_index_saturates_on_overflow() {
        assert_eq!(frame_index(f64::INFINITY, 30.0), usize::MAX);
        assert_eq!(frame_index(f64::MAX, 30.0), usize::MAX);
        assert_eq!(frame_index(1e300, 30.0), usize::MAX);
    }

    #[test]
    fn test_resolve_out_of_range_is_blank() {
        let data = TrackDataset::new(
            30.0,
            vec![Frame::new(vec![Detection::new(7, [10.0, 10.0, 50.0, 50.0])])],
        );
        assert_eq!(data.resolve(0.0).0, 0);
        assert!(data.resolve(0.0).1.is_some());
        assert!(data.resolve(0.05).1.is_none());
        assert!(data.resolve(1.0).1.is_none());
        assert!(TrackDataset::default().resolve(0.0).1.is_none());
    }

    #[test]
    fn test_huge_times_are_blank() {
        let data = TrackDataset::new(
            30.0,
            vec![Frame::new(vec![Detection::new(7, [10.0, 10.0, 50.0, 50.0])])],
        );
        for time in [1e300, f64::MAX, f64::INFINITY] {
            let (index, frame) = data.resolve(time);
            assert_eq!(index, usize::MAX);
            assert!(frame.is_none(), "t={} should have no data", time);
        }
    }

    #[test]
    fn test_detection_rect_orders_axes() {
        let det = Detection::new(1, [50.0, 60.0, 10.0, 20.0]);
        let rect = det.rect().unwrap();
        assert_eq!(rect.min, egui::pos2(10.0, 20.0));
        assert_eq!(rect.max, egui::pos2(50.0, 60.0));
    }

    #[test]
    fn test_detection_rect_rejects_non_finite() {
        assert!(Detection::new(1, [f64::NAN, 0.0, 1.0, 1.0]).rect().is_none());
        assert!(Detection::new(1, [0.0, 0.0, f64::INFINITY, 1.0]).rect().is_none());
        let zero = Detection::new(1, [0.0, 0.0, 0.0, 0.0]).rect().unwrap();
        assert_eq!(zero.area(), 0.0);
    }

    #[test]
    fn test_parse_backend_payload() {
        let json = r#"{
            "video": {"fps": 15.0, "width": 1280, "height": 720, "frames": 2},
            "frames": [
                {"f": 0, "dets": [{"id": 3, "bbox": [1.0, 2.0, 30.0, 40.0], "conf": 0.91}]},
                {"f": 1, "dets": []}
            ]
        }"#;
        let data: TrackDataset = serde_json::from_str(json).unwrap();
        assert_eq!(data.fps(), 15.0);
        assert_eq!(data.video.intrinsic_size(), Some([1280, 720]));
        assert_eq!(data.video.frame_count, Some(2));
        assert_eq!(data.frames.len(), 2);
        assert_eq!(data.frames[0].number, Some(0));
        assert_eq!(data.frames[0].dets[0].conf, Some(0.91));
        assert_eq!(data.frames[0].dets[0].label(), "ID 3");
    }

    #[test]
    fn test_parse_minimal_payload() {
        let data: TrackDataset =
            serde_json::from_str(r#"{"frames": [{"dets": [{"id": 9, "bbox": [0, 0, 1, 1]}]}]}"#)
                .unwrap();
        assert_eq!(data.fps(), DEFAULT_FPS);
        assert_eq!(data.video.intrinsic_size(), None);
        assert_eq!(data.frames[0].number, None);
    }

    #[test]
    fn test_summary_counts() {
        let data = TrackDataset::new(
            30.0,
            vec![
                Frame::new(vec![Detection::new(1, [0.0; 4]), Detection::new(2, [0.0; 4])]),
                Frame::new(vec![Detection::new(1, [0.0; 4])]),
                Frame::default(),
            ],
        );
        assert_eq!(
            data.summary(),
            TrackSummary {
                frames: 3,
                detections: 3,
                track_ids: 2,
            }
        );
        assert_eq!(TrackDataset::default().summary().track_ids, 0);
    }

    #[test]
    fn test_track_ids_and_duration() {
        let data = TrackDataset::new(
            10.0,
            vec![
                Frame::new(vec![Detection::new(4, [0.0; 4]), Detection::new(2, [0.0; 4])]),
                Frame::new(vec![Detection::new(4, [0.0; 4])]),
                Frame::default(),
                Frame::new(vec![Detection::new(11, [0.0; 4])]),
            ],
        );
        let ids: Vec<i64> = data.track_ids().into_iter().collect();
        assert_eq!(ids, vec![2, 4, 11]);
        assert!((data.duration() - 0.4).abs() < 1e-9);
    }
}
