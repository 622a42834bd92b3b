// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with overlay and playback toggles.

/// Display the toolbar. Toggles are edited in place.
pub fn show(ui: &mut egui::Ui, show_overlay: &mut bool, looping: &mut bool) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("View:");

        ui.separator();

        if ui.selectable_label(*show_overlay, "▭ Overlay").clicked() {
            *show_overlay = !*show_overlay;
        }

        if ui.selectable_label(*looping, "⟲ Loop").clicked() {
            *looping = !*looping;
        }

        ui.separator();

        let hint = if *show_overlay {
            "Boxes follow playback; Space to play/pause, ←/→ to step frames"
        } else {
            "Overlay hidden"
        };

        ui.label(egui::RichText::new(hint).italics().weak());
    });
}
