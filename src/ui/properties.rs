// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tracking info panel.
//!
//! This module provides the side panel showing the current frame report,
//! the job's track summary, the detections in the current frame and a
//! legend for the overlay.

use crate::config::OverlayStyle;
use crate::models::track::{TrackDataset, TrackSummary};
use crate::overlay::{FrameInfo, LoopState};
use std::path::Path;

/// What the panel is showing results for.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobSource<'a> {
    pub job: Option<&'a str>,
    pub video: Option<&'a Path>,
}

/// Display the info panel.
///
/// `summary` is computed once per dataset load by the caller.
pub fn show(
    ui: &mut egui::Ui,
    source: JobSource<'_>,
    info: Option<FrameInfo>,
    loop_state: LoopState,
    dataset: Option<&TrackDataset>,
    summary: Option<TrackSummary>,
    style: &OverlayStyle,
) {
    ui.heading("Tracking");
    ui.separator();

    egui::Grid::new("frame_info")
        .num_columns(2)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            ui.label("FPS");
            ui.strong(
                info.map(|i| format!("{:.2}", i.fps))
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            ui.end_row();

            ui.label("Frame");
            ui.strong(
                info.map(|i| i.frame_index.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            ui.end_row();

            ui.label("Detections");
            ui.strong(
                info.map(|i| i.det_count.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            ui.end_row();

            ui.label("Overlay");
            ui.strong(loop_state_label(loop_state));
            ui.end_row();

            ui.label("Job");
            ui.strong(source.job.unwrap_or("N/A"));
            ui.end_row();

            ui.label("Video");
            let name = ui.strong(
                source
                    .video
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            if let Some(path) = source.video {
                name.on_hover_text(path.display().to_string());
            }
            ui.end_row();

            ui.label("Track IDs");
            ui.strong(
                summary
                    .map(|s| s.track_ids.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            ui.end_row();

            ui.label("Tracked frames");
            ui.strong(
                summary
                    .map(|s| format!("{} ({} boxes)", s.frames, s.detections))
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Current frame").strong());
    ui.separator();

    let current = dataset.zip(info).and_then(|(d, i)| d.frames.get(i.frame_index));
    match current {
        Some(frame) if !frame.dets.is_empty() => {
            egui::ScrollArea::vertical()
                .max_height(240.0)
                .show(ui, |ui| {
                    for det in &frame.dets {
                        let [x1, y1, x2, y2] = det.bbox;
                        let conf = det
                            .conf
                            .map(|c| format!("  {:.0}%", c * 100.0))
                            .unwrap_or_default();
                        ui.label(
                            egui::RichText::new(format!(
                                "{:<6} [{:.0}, {:.0}, {:.0}, {:.0}]{}",
                                det.label(),
                                x1,
                                y1,
                                x2,
                                y2,
                                conf
                            ))
                            .monospace(),
                        );
                    }
                });
        }
        _ => {
            ui.label(egui::RichText::new("No detections").weak());
        }
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Legend").strong());
    ui.separator();
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 12.0), egui::Sense::hover());
        ui.painter().rect_stroke(rect, 0.0, egui::Stroke::new(2.0, style.color32()));
        ui.label("Head region");
    });
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("ID n").color(style.color32()).monospace());
        ui.label("Persistent tracker ID");
    });
}

fn loop_state_label(state: LoopState) -> &'static str {
    match state {
        LoopState::Idle => "Idle",
        LoopState::Armed(_) => "Running",
        LoopState::Painting => "Painting",
    }
}
