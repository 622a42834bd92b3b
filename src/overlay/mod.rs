// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame-synchronized overlay rendering.
//!
//! The overlay core only talks to its collaborators through the capability
//! traits defined here, so it can be driven by the egui shell or by a test
//! harness alike:
//!
//! - [`VideoSource`] provides the playback clock and the video's sizes.
//! - [`DrawingSurface`] is the pixel-space target the boxes are painted on.
//! - [`FrameRequester`] is the per-display-frame scheduling primitive.
//!
//! [`sync`] keeps the surface sized to the video, and
//! [`scheduler::OverlayScheduler`] drives the paint loop.

pub mod scheduler;
pub mod sync;

pub use scheduler::{FrameInfo, LoopState, OverlayScheduler};
pub use sync::{sync, SyncTrigger};

/// On-screen footprint of the video or of the drawing surface.
///
/// A `None` height means "auto": derived from the pixel buffer's aspect
/// ratio at layout time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayBox {
    pub width: f32,
    pub height: Option<f32>,
}

impl DisplayBox {
    #[cfg(test)]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height: Some(height),
        }
    }

    pub fn auto_height(width: f32) -> Self {
        Self {
            width,
            height: None,
        }
    }

    /// Concrete height for a buffer of the given pixel size.
    pub fn resolved_height(&self, buffer: [u32; 2]) -> f32 {
        match self.height {
            Some(h) => h,
            None if buffer[0] > 0 => self.width * buffer[1] as f32 / buffer[0] as f32,
            None => 0.0,
        }
    }
}

/// Read-only view of a playing video.
pub trait VideoSource {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Decoded pixel size, or `None` until metadata has loaded.
    fn intrinsic_size(&self) -> Option<[u32; 2]>;

    /// Current rendered size of the video.
    fn display_box(&self) -> DisplayBox;
}

/// A drawing target addressed in pixel-buffer coordinates.
///
/// The buffer is scaled as a whole to the display box when shown.
pub trait DrawingSurface {
    fn buffer_size(&self) -> [u32; 2];

    /// Resize the pixel buffer. Prior contents are discarded.
    fn set_buffer_size(&mut self, size: [u32; 2]);

    fn display_box(&self) -> DisplayBox;

    fn set_display_box(&mut self, display: DisplayBox);

    /// Clear the entire pixel buffer.
    fn clear(&mut self);

    fn stroke_rect(&mut self, rect: egui::Rect, stroke: egui::Stroke);

    fn fill_rect(&mut self, rect: egui::Rect, color: egui::Color32);

    /// Draw text with its baseline-left corner at `anchor`, optionally over
    /// a backdrop sized to the rendered text.
    fn draw_text(
        &mut self,
        anchor: egui::Pos2,
        text: &str,
        font_size: f32,
        color: egui::Color32,
        background: Option<egui::Color32>,
    );
}

/// Handle for one pending per-display-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The platform's "call me on the next display frame" primitive.
pub trait FrameRequester {
    /// Register interest in the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending request. Unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}
