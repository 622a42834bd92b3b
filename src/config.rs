// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview configuration.
//!
//! Settings are read from an optional YAML file. Every field has a default,
//! so a partial file only overrides what it names.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How boxes and labels are painted, in intrinsic pixel units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Box and label color as `[r, g, b]`.
    pub color: [u8; 3],
    pub stroke_width: f32,
    pub font_size: f32,
    /// Label position relative to the box's top-left corner.
    pub label_offset: [f32; 2],
    /// Labels never go above this baseline, so boxes at the top edge stay labelled.
    pub label_min_y: f32,
    /// Optional `[r, g, b, a]` backdrop filled behind each label.
    pub label_background: Option<[u8; 4]>,
    /// Optional `[r, g, b, a]` tint filled inside each box.
    pub box_fill: Option<[u8; 4]>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            stroke_width: 2.0,
            font_size: 16.0,
            label_offset: [4.0, -6.0],
            label_min_y: 18.0,
            label_background: None,
            box_fill: None,
        }
    }
}

impl OverlayStyle {
    pub fn color32(&self) -> egui::Color32 {
        let [r, g, b] = self.color;
        egui::Color32::from_rgb(r, g, b)
    }

    pub fn stroke(&self) -> egui::Stroke {
        egui::Stroke::new(self.stroke_width, self.color32())
    }

    pub fn label_background32(&self) -> Option<egui::Color32> {
        self.label_background.map(rgba)
    }

    pub fn box_fill32(&self) -> Option<egui::Color32> {
        self.box_fill.map(rgba)
    }

    /// Baseline-left anchor for the label of a box whose top-left is `min`.
    pub fn label_anchor(&self, min: egui::Pos2) -> egui::Pos2 {
        egui::pos2(
            min.x + self.label_offset[0],
            (min.y + self.label_offset[1]).max(self.label_min_y),
        )
    }
}

fn rgba([r, g, b, a]: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub window_size: [f32; 2],
    pub overlay: OverlayStyle,
    /// Start playing as soon as a video is opened.
    pub autoplay: bool,
    pub loop_playback: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            window_size: [1280.0, 720.0],
            overlay: OverlayStyle::default(),
            autoplay: false,
            loop_playback: true,
        }
    }
}

impl PreviewConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("failed parsing config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_matches_overlay_contract() {
        let style = OverlayStyle::default();
        assert_eq!(style.color32(), egui::Color32::from_rgb(0, 255, 0));
        assert_eq!(style.stroke_width, 2.0);
        assert_eq!(style.label_background32(), None);
    }

    #[test]
    fn test_label_anchor() {
        let style = OverlayStyle::default();
        assert_eq!(style.label_anchor(egui::pos2(10.0, 10.0)), egui::pos2(14.0, 18.0));
        assert_eq!(style.label_anchor(egui::pos2(0.0, 0.0)), egui::pos2(4.0, 18.0));
        assert_eq!(style.label_anchor(egui::pos2(100.0, 200.0)), egui::pos2(104.0, 194.0));
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let config = PreviewConfig::from_yaml(
            "autoplay: true\noverlay:\n  stroke_width: 3.5\n  label_background: [0, 0, 0, 160]\n",
        )
        .unwrap();
        assert!(config.autoplay);
        assert!(config.loop_playback);
        assert_eq!(config.overlay.stroke_width, 3.5);
        assert_eq!(config.overlay.font_size, 16.0);
        assert_eq!(config.overlay.label_background, Some([0, 0, 0, 160]));
        assert_eq!(config.overlay.box_fill32(), None);
    }

    #[test]
    fn test_box_fill_from_yaml() {
        let config = PreviewConfig::from_yaml("overlay:\n  box_fill: [0, 255, 0, 40]\n").unwrap();
        assert_eq!(
            config.overlay.box_fill32(),
            Some(egui::Color32::from_rgba_unmultiplied(0, 255, 0, 40))
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(PreviewConfig::from_yaml("  \n").unwrap(), PreviewConfig::default());
    }

    #[test]
    fn test_bad_yaml_is_error() {
        assert!(PreviewConfig::from_yaml("overlay: [1, 2").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("headhuntr-preview-missing-config.yaml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(PreviewConfig::load(&path).unwrap(), PreviewConfig::default());
    }
}
