// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the mapping between the overlay's intrinsic pixel
//! space and screen space, plus the letterbox fit used to lay the video out.

/// Largest rect with the aspect ratio of `size` that fits centered in `available`.
pub fn fit_rect(size: [u32; 2], available: egui::Rect) -> egui::Rect {
    let [width, height] = size;
    if width == 0 || height == 0 || available.width() <= 0.0 || available.height() <= 0.0 {
        return egui::Rect::from_min_size(available.min, egui::Vec2::ZERO);
    }

    let img_aspect = width as f32 / height as f32;
    let available_aspect = available.width() / available.height();

    let display = if img_aspect > available_aspect {
        // Wider than the area - fit to width
        egui::vec2(available.width(), available.width() / img_aspect)
    } else {
        // Taller than the area - fit to height
        egui::vec2(available.height() * img_aspect, available.height())
    };

    egui::Rect::from_center_size(available.center(), display)
}

/// Per-axis scale from intrinsic pixels to display units.
pub fn display_scale(buffer: [u32; 2], display: egui::Vec2) -> egui::Vec2 {
    if buffer[0] == 0 || buffer[1] == 0 {
        return egui::Vec2::ZERO;
    }
    egui::vec2(display.x / buffer[0] as f32, display.y / buffer[1] as f32)
}

/// Map an intrinsic pixel position into a display rect.
pub fn to_display(point: egui::Pos2, buffer: [u32; 2], display: egui::Rect) -> egui::Pos2 {
    let scale = display_scale(buffer, display.size());
    display.min + egui::vec2(point.x * scale.x, point.y * scale.y)
}

/// Map an intrinsic pixel rect into a display rect.
pub fn rect_to_display(rect: egui::Rect, buffer: [u32; 2], display: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        to_display(rect.min, buffer, display),
        to_display(rect.max, buffer, display),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_video_into_square() {
        let available = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 800.0));
        let fitted = fit_rect([1920, 1080], available);
        assert!((fitted.width() - 800.0).abs() < 0.001);
        assert!((fitted.height() - 450.0).abs() < 0.001);
        assert!((fitted.min.y - 175.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_tall_video() {
        let available =
            egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(1000.0, 500.0));
        let fitted = fit_rect([1080, 1920], available);
        assert!((fitted.height() - 500.0).abs() < 0.001);
        assert!((fitted.width() - 281.25).abs() < 0.001);
        assert!((fitted.center().x - 510.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_unknown_size_is_empty() {
        let available = egui::Rect::from_min_size(egui::pos2(5.0, 5.0), egui::vec2(100.0, 100.0));
        assert_eq!(fit_rect([0, 0], available).area(), 0.0);
    }

    #[test]
    fn test_to_display_corners() {
        let display = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(960.0, 540.0));
        let buffer = [1920, 1080];

        assert_eq!(to_display(egui::pos2(0.0, 0.0), buffer, display), egui::pos2(100.0, 50.0));
        assert_eq!(
            to_display(egui::pos2(1920.0, 1080.0), buffer, display),
            egui::pos2(1060.0, 590.0)
        );

        let rect = egui::Rect::from_min_max(egui::pos2(10.0, 10.0), egui::pos2(50.0, 50.0));
        let mapped = rect_to_display(rect, buffer, display);
        assert_eq!(mapped.min, egui::pos2(105.0, 55.0));
        assert_eq!(mapped.max, egui::pos2(125.0, 75.0));
    }

    #[test]
    fn test_display_scale_empty_buffer() {
        assert_eq!(display_scale([0, 720], egui::vec2(100.0, 100.0)), egui::Vec2::ZERO);
    }
}
