// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline scrubber control.
//!
//! This module provides the play/pause button, the scrubber for seeking
//! through the video, and the time and frame readout.

use crate::models::playback::Playback;
use crate::overlay::VideoSource;

/// Result of timeline interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineAction {
    None,
    TogglePlay,
    Seek(f64),
}

/// Display the timeline for `playback`, spanning `duration` seconds.
pub fn show(ui: &mut egui::Ui, playback: &Playback, duration: f64, fps: f64) -> TimelineAction {
    let mut action = TimelineAction::None;
    let position = playback.current_time();

    ui.horizontal(|ui| {
        let label = if playback.is_playing() { "⏸" } else { "▶" };
        if ui.button(label).clicked() {
            action = TimelineAction::TogglePlay;
        }

        let readout = format!(
            "{} / {}  frame {}",
            format_time(position),
            format_time(duration),
            crate::models::track::frame_index(position, fps)
        );

        // Leave room for the readout on the right
        let readout_width = 190.0;
        ui.spacing_mut().slider_width = (ui.available_width() - readout_width).max(80.0);

        let mut scrub = position;
        let response = ui.add(
            egui::Slider::new(&mut scrub, 0.0..=duration.max(0.001))
                .show_value(false),
        );
        if response.changed() {
            action = TimelineAction::Seek(scrub);
        }

        ui.label(egui::RichText::new(readout).monospace());
    });

    action
}

/// `m:ss.cc` for a time in seconds.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "N/A".to_string();
    }
    let centis = (seconds * 100.0).floor() as u64;
    let mins = centis / 6000;
    let secs = (centis / 100) % 60;
    format!("{}:{:02}.{:02}", mins, secs, centis % 100)
}
