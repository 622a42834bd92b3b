// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback clock for the opened video.
//!
//! The shell advances the clock by each UI frame's delta time. The overlay
//! reads it through [`VideoSource`], exactly as it would read a media
//! element's current time.

use crate::overlay::{DisplayBox, VideoSource};
use std::path::{Path, PathBuf};

/// Playback state of the currently opened video.
#[derive(Debug, Clone)]
pub struct Playback {
    source: PathBuf,
    position: f64,
    playing: bool,
    looping: bool,
    duration: Option<f64>,
    intrinsic: Option<[u32; 2]>,
    display: DisplayBox,
}

impl Playback {
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            position: 0.0,
            playing: false,
            looping: true,
            duration: None,
            intrinsic: None,
            display: DisplayBox::default(),
        }
    }

    /// Record the video's metadata. Returns `true` if the intrinsic size changed.
    pub fn load_metadata(&mut self, intrinsic: [u32; 2], duration: Option<f64>) -> bool {
        let duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        if duration.is_some() {
            self.duration = duration;
        }
        if intrinsic[0] == 0 || intrinsic[1] == 0 || self.intrinsic == Some(intrinsic) {
            return false;
        }
        log::info!(
            "Video metadata: {}x{}, duration {:?}",
            intrinsic[0],
            intrinsic[1],
            self.duration
        );
        self.intrinsic = Some(intrinsic);
        true
    }

    /// File the clock belongs to.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn has_metadata(&self) -> bool {
        self.intrinsic.is_some()
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn play(&mut self) {
        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = 0.0;
            }
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to `time`, clamped to the known duration.
    pub fn seek(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        self.position = match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        };
    }

    /// Move the playhead forward by `dt` seconds if playing.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.position += dt;
        if let Some(duration) = self.duration {
            if self.position >= duration {
                if self.looping {
                    self.position %= duration;
                } else {
                    self.position = duration;
                    self.playing = false;
                }
            }
        }
    }

    pub fn set_display_box(&mut self, display: DisplayBox) {
        self.display = display;
    }
}

impl VideoSource for Playback {
    fn current_time(&self) -> f64 {
        self.position
    }

    fn intrinsic_size(&self) -> Option<[u32; 2]> {
        self.intrinsic
    }

    fn display_box(&self) -> DisplayBox {
        self.display
    }
}
