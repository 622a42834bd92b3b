// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video canvas with the tracking overlay.
//!
//! This module provides the central area where the current video frame is
//! shown, the retained overlay surface the scheduler paints into, and the
//! egui-backed frame requester that drives the paint loop.

use crate::overlay::{DisplayBox, DrawingSurface, FrameHandle, FrameRequester};
use crate::util::geometry::{display_scale, fit_rect, rect_to_display, to_display};

/// One recorded paint call, in intrinsic pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    StrokeRect {
        rect: egui::Rect,
        stroke: egui::Stroke,
    },
    FillRect {
        rect: egui::Rect,
        color: egui::Color32,
    },
    Text {
        anchor: egui::Pos2,
        text: String,
        font_size: f32,
        color: egui::Color32,
        /// Filled behind the text once it has been laid out.
        background: Option<egui::Color32>,
    },
}

/// Backdrop margin around a label, in intrinsic pixels.
const LABEL_PADDING: f32 = 2.0;

/// Retained drawing surface.
///
/// egui redraws everything each frame, so the "pixel buffer" is a display
/// list in intrinsic pixels. It is replayed scaled into the video's display
/// rect, which keeps boxes aligned at any window size.
#[derive(Debug, Clone, Default)]
pub struct OverlayCanvas {
    buffer: [u32; 2],
    display: DisplayBox,
    commands: Vec<DrawCommand>,
}

impl OverlayCanvas {
    #[cfg(test)]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Screen rect the buffer covers when its top-left sits at `origin`.
    ///
    /// `None` until both the buffer and the display box have a size.
    pub fn display_rect(&self, origin: egui::Pos2) -> Option<egui::Rect> {
        let width = self.display.width;
        let height = self.display.resolved_height(self.buffer);
        if self.buffer[0] == 0 || self.buffer[1] == 0 || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(egui::Rect::from_min_size(origin, egui::vec2(width, height)))
    }

    /// Replay the display list at the surface's display box.
    pub fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        let Some(display_rect) = self.display_rect(origin) else {
            return;
        };
        let scale = display_scale(self.buffer, display_rect.size());

        for command in &self.commands {
            match command {
                DrawCommand::StrokeRect { rect, stroke } => {
                    painter.rect_stroke(
                        rect_to_display(*rect, self.buffer, display_rect),
                        0.0,
                        egui::Stroke::new(stroke.width * scale.x, stroke.color),
                    );
                }
                DrawCommand::FillRect { rect, color } => {
                    painter.rect_filled(
                        rect_to_display(*rect, self.buffer, display_rect),
                        0.0,
                        *color,
                    );
                }
                DrawCommand::Text {
                    anchor,
                    text,
                    font_size,
                    color,
                    background,
                } => {
                    let font = egui::FontId::proportional((font_size * scale.y).max(1.0));
                    let galley = painter.layout_no_wrap(text.clone(), font, *color);
                    let rect = egui::Align2::LEFT_BOTTOM
                        .anchor_size(to_display(*anchor, self.buffer, display_rect), galley.size());
                    if let Some(fill) = background {
                        painter.rect_filled(rect.expand(LABEL_PADDING * scale.y), 0.0, *fill);
                    }
                    painter.galley(rect.min, galley, *color);
                }
            }
        }
    }
}

impl DrawingSurface for OverlayCanvas {
    fn buffer_size(&self) -> [u32; 2] {
        self.buffer
    }

    fn set_buffer_size(&mut self, size: [u32; 2]) {
        self.buffer = size;
        self.commands.clear();
    }

    fn display_box(&self) -> DisplayBox {
        self.display
    }

    fn set_display_box(&mut self, display: DisplayBox) {
        self.display = display;
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn stroke_rect(&mut self, rect: egui::Rect, stroke: egui::Stroke) {
        self.commands.push(DrawCommand::StrokeRect { rect, stroke });
    }

    fn fill_rect(&mut self, rect: egui::Rect, color: egui::Color32) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_text(
        &mut self,
        anchor: egui::Pos2,
        text: &str,
        font_size: f32,
        color: egui::Color32,
        background: Option<egui::Color32>,
    ) {
        self.commands.push(DrawCommand::Text {
            anchor,
            text: text.to_owned(),
            font_size,
            color,
            background,
        });
    }
}

/// Frame requester backed by egui repaints.
///
/// A request asks egui for another frame; the app polls [`take_due`] at the
/// start of its next update and hands the handle to the scheduler.
///
/// [`take_due`]: RepaintRequester::take_due
#[derive(Debug)]
pub struct RepaintRequester {
    ctx: egui::Context,
    next: u64,
    pending: Option<FrameHandle>,
}

impl RepaintRequester {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            next: 0,
            pending: None,
        }
    }

    /// The pending request, consumed. Called once per egui frame.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameRequester for RepaintRequester {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        self.ctx.request_repaint();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Display the video area. Returns the rect the video occupies, if any.
///
/// The overlay is painted by the caller once the surface has been synced
/// to this rect.
pub fn show(
    ui: &mut egui::Ui,
    intrinsic: Option<[u32; 2]>,
    frame_texture: Option<&egui::TextureHandle>,
    has_video: bool,
) -> Option<egui::Rect> {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();
    let mut video_rect = None;

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);
        let available = egui::Rect::from_min_size(ui.min_rect().min, ui.available_size());

        match (has_video, intrinsic) {
            (true, Some(size)) => {
                let rect = fit_rect(size, available);
                let painter = ui.painter_at(rect);

                if let Some(texture) = frame_texture {
                    painter.image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                } else {
                    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(15));
                }
                video_rect = Some(rect);
            }
            (true, None) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Waiting for video metadata...")
                            .color(egui::Color32::WHITE),
                    );
                });
            }
            (false, _) => {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("HeadHuntr")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.label(
                            egui::RichText::new("Tracking overlay preview")
                                .size(14.0)
                                .color(egui::Color32::from_gray(150)),
                        );
                        ui.add_space(20.0);
                        ui.label(
                            egui::RichText::new("Open a video and its tracks to preview head IDs")
                                .color(egui::Color32::from_gray(180)),
                        );
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new("File → Open Video... / Load Tracks...")
                                .weak()
                                .color(egui::Color32::from_gray(130)),
                        );
                    });
                });
            }
        }
    });

    video_rect
}
