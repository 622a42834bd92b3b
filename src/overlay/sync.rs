// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate synchronizer.
//!
//! Keeps the drawing surface's pixel buffer equal to the video's intrinsic
//! resolution and its display box equal to the video's rendered size. Boxes
//! are always drawn in intrinsic pixels, so the buffer size is what keeps
//! them aligned with the decoded frame; the display box only scales the
//! whole buffer on screen.

use super::{DrawingSurface, VideoSource};

/// Why a resync was requested. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    MetadataLoaded,
    DataLoaded,
    Resize,
}

/// What a call to [`sync`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Video, surface or intrinsic size not available yet.
    NotReady,
    /// Sizes already matched.
    Unchanged,
    /// Only the display box changed; buffer contents survive.
    DisplayUpdated,
    /// The pixel buffer was resized, discarding its contents.
    BufferResized,
}

/// Align `surface` to `video`.
///
/// A missing video or surface, or a video whose intrinsic size is still
/// unknown, is a no-op; callers retry on the next metadata or resize event.
/// The buffer is only resized when its size actually differs, so redundant
/// calls leave an in-progress paint alone.
pub fn sync<V, S>(video: Option<&V>, surface: Option<&mut S>, trigger: SyncTrigger) -> SyncOutcome
where
    V: VideoSource + ?Sized,
    S: DrawingSurface + ?Sized,
{
    let (Some(video), Some(surface)) = (video, surface) else {
        return SyncOutcome::NotReady;
    };
    let Some(intrinsic) = video.intrinsic_size().filter(|[w, h]| *w > 0 && *h > 0) else {
        return SyncOutcome::NotReady;
    };

    let mut outcome = SyncOutcome::Unchanged;

    if surface.buffer_size() != intrinsic {
        log::debug!(
            "{:?}: overlay buffer {:?} -> {}x{}",
            trigger,
            surface.buffer_size(),
            intrinsic[0],
            intrinsic[1]
        );
        surface.set_buffer_size(intrinsic);
        outcome = SyncOutcome::BufferResized;
    }

    let display = video.display_box();
    if surface.display_box() != display {
        log::debug!("{:?}: overlay display box -> {:?}", trigger, display);
        surface.set_display_box(display);
        if outcome == SyncOutcome::Unchanged {
            outcome = SyncOutcome::DisplayUpdated;
        }
    }

    outcome
}
