// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay scheduler.
//!
//! Drives the per-display-frame paint loop. The loop is an explicit state
//! machine: it is [`LoopState::Idle`] until a non-empty dataset is present
//! and the view is mounted, then [`LoopState::Armed`] with exactly one
//! pending frame request. Every dataset swap, source change or unmount
//! cancels the pending request before anything new is armed, so two loops
//! never paint at the same time.

use super::{DrawingSurface, FrameHandle, FrameRequester, VideoSource};
use crate::config::OverlayStyle;
use crate::models::track::{Frame, TrackDataset};
use std::sync::Arc;

/// Loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No dataset, or nothing mounted. No pending work.
    Idle,
    /// One paint callback is pending with the frame requester.
    Armed(FrameHandle),
    /// Inside a tick.
    Painting,
}

/// What one tick painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub fps: f64,
    pub frame_index: usize,
    /// Boxes actually drawn; malformed detections are not counted.
    pub det_count: usize,
}

/// Owns the paint loop for one mounted view.
#[derive(Debug)]
pub struct OverlayScheduler {
    state: LoopState,
    dataset: Option<Arc<TrackDataset>>,
    mounted: bool,
    style: OverlayStyle,
    last_info: Option<FrameInfo>,
}

impl OverlayScheduler {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            state: LoopState::Idle,
            dataset: None,
            mounted: false,
            style,
            last_info: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, LoopState::Armed(_))
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn dataset(&self) -> Option<&Arc<TrackDataset>> {
        self.dataset.as_ref()
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Report from the most recent tick that resolved a frame.
    pub fn last_info(&self) -> Option<FrameInfo> {
        self.last_info
    }

    /// Replace the dataset (or clear it with `None`).
    ///
    /// Any pending tick for the old dataset is cancelled first; the next
    /// tick, if re-armed, reads the new one.
    pub fn set_dataset<R>(&mut self, dataset: Option<Arc<TrackDataset>>, frames: &mut R)
    where
        R: FrameRequester + ?Sized,
    {
        self.cancel(frames);
        self.dataset = dataset;
        self.last_info = None;
        match &self.dataset {
            Some(data) => log::info!(
                "Overlay dataset replaced: {} frames at {} fps",
                data.frames.len(),
                data.fps()
            ),
            None => log::info!("Overlay dataset cleared"),
        }
        self.try_arm(frames);
    }

    /// The video and surface are in place.
    pub fn mount<R>(&mut self, frames: &mut R)
    where
        R: FrameRequester + ?Sized,
    {
        if !self.mounted {
            log::info!("Overlay view mounted");
            self.mounted = true;
        }
        self.try_arm(frames);
    }

    /// The view is going away. No further paint calls happen until remounted.
    pub fn unmount<R>(&mut self, frames: &mut R)
    where
        R: FrameRequester + ?Sized,
    {
        self.cancel(frames);
        if self.mounted {
            log::info!("Overlay view unmounted");
            self.mounted = false;
        }
        self.last_info = None;
    }

    /// The media resource changed. The old loop is torn down and, if the
    /// view is still mounted with data, a fresh one is armed.
    pub fn source_changed<R>(&mut self, frames: &mut R)
    where
        R: FrameRequester + ?Sized,
    {
        log::info!("Overlay source changed");
        self.cancel(frames);
        self.last_info = None;
        self.try_arm(frames);
    }

    /// Run one tick for a fired frame request.
    ///
    /// Requests that are not the currently armed one are stale and do
    /// nothing; those return `None`.
    pub fn on_frame<V, S, R>(
        &mut self,
        handle: FrameHandle,
        video: &V,
        surface: &mut S,
        frames: &mut R,
    ) -> Option<FrameInfo>
    where
        V: VideoSource + ?Sized,
        S: DrawingSurface + ?Sized,
        R: FrameRequester + ?Sized,
    {
        if self.state != LoopState::Armed(handle) {
            log::trace!("Ignoring stale overlay tick {:?}", handle);
            return None;
        }
        let Some(dataset) = self.dataset.clone() else {
            self.state = LoopState::Idle;
            return None;
        };

        self.state = LoopState::Painting;
        let time = video.current_time();
        let (frame_index, frame) = dataset.resolve(time);
        let det_count = paint_frame(surface, frame, &self.style);
        log::trace!("Overlay tick t={:.3} frame={} boxes={}", time, frame_index, det_count);

        let info = FrameInfo {
            fps: dataset.fps(),
            frame_index,
            det_count,
        };
        self.last_info = Some(info);

        self.state = LoopState::Idle;
        self.try_arm(frames);
        Some(info)
    }

    fn try_arm<R>(&mut self, frames: &mut R)
    where
        R: FrameRequester + ?Sized,
    {
        if self.state != LoopState::Idle || !self.mounted {
            return;
        }
        if self.dataset.as_ref().map_or(true, |d| d.is_empty()) {
            return;
        }
        let handle = frames.request_frame();
        log::trace!("Overlay loop armed with {:?}", handle);
        self.state = LoopState::Armed(handle);
    }

    fn cancel<R>(&mut self, frames: &mut R)
    where
        R: FrameRequester + ?Sized,
    {
        if let LoopState::Armed(handle) = self.state {
            frames.cancel_frame(handle);
            log::debug!("Overlay loop cancelled {:?}", handle);
        }
        self.state = LoopState::Idle;
    }
}

/// Clear `surface` and draw every well-formed detection of `frame`.
///
/// Returns the number of boxes drawn. `None` leaves the surface blank.
pub fn paint_frame<S>(surface: &mut S, frame: Option<&Frame>, style: &OverlayStyle) -> usize
where
    S: DrawingSurface + ?Sized,
{
    surface.clear();
    let Some(frame) = frame else {
        return 0;
    };

    let stroke = style.stroke();
    let color = style.color32();
    let box_fill = style.box_fill32();
    let background = style.label_background32();
    let mut drawn = 0;

    for det in &frame.dets {
        let Some(rect) = det.rect() else {
            log::trace!("Skipping malformed detection {} {:?}", det.id, det.bbox);
            continue;
        };
        if let Some(fill) = box_fill {
            surface.fill_rect(rect, fill);
        }
        surface.stroke_rect(rect, stroke);

        let anchor = style.label_anchor(rect.min);
        surface.draw_text(anchor, &det.label(), style.font_size, color, background);
        drawn += 1;
    }

    drawn
}
