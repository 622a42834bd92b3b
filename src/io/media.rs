// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video file decoding.
//!
//! This module opens video files, reports their metadata and decodes the
//! frame under the playhead for display beneath the overlay. Decoding needs
//! the `video-opencv` feature; without it [`VideoDecoder::open`] fails and
//! the preview falls back to the intrinsic size carried by the tracks.

use crate::models::track::frame_index;

/// Metadata read from an opened video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub size: [u32; 2],
    pub fps: f64,
    pub frame_count: usize,
}

impl VideoInfo {
    pub fn duration(&self) -> Option<f64> {
        if self.fps > 0.0 && self.frame_count > 0 {
            Some(self.frame_count as f64 / self.fps)
        } else {
            None
        }
    }

    /// Source frame shown at playback time `time`.
    pub fn frame_at(&self, time: f64) -> usize {
        let index = frame_index(time, self.fps);
        if self.frame_count > 0 {
            index.min(self.frame_count - 1)
        } else {
            index
        }
    }
}

/// One decoded frame, RGBA8.
pub struct DecodedFrame {
    pub index: usize,
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

impl DecodedFrame {
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size, &self.pixels)
    }
}

#[cfg(feature = "video-opencv")]
mod decoder {
    use super::{DecodedFrame, VideoInfo};
    use anyhow::{bail, Context, Result};
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use std::path::Path;

    /// OpenCV-backed sequential decoder with seek on jumps.
    pub struct VideoDecoder {
        capture: videoio::VideoCapture,
        info: VideoInfo,
        next_index: usize,
    }

    impl VideoDecoder {
        pub fn open(path: &Path) -> Result<Self> {
            let path_str = path
                .to_str()
                .with_context(|| format!("non UTF-8 video path {}", path.display()))?;
            let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
                .with_context(|| format!("failed opening {}", path.display()))?;
            if !capture.is_opened()? {
                bail!("could not open video {}", path.display());
            }

            let fps = capture.get(videoio::CAP_PROP_FPS)?;
            let info = VideoInfo {
                size: [
                    capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32,
                    capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32,
                ],
                fps: if fps.is_finite() && fps > 0.0 { fps } else { 30.0 },
                frame_count: capture.get(videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as usize,
            };
            log::info!("Opened video {}: {:?}", path.display(), info);

            Ok(Self {
                capture,
                info,
                next_index: 0,
            })
        }

        pub fn info(&self) -> &VideoInfo {
            &self.info
        }

        /// Decode frame `index`. `Ok(None)` past the end of the stream.
        pub fn frame(&mut self, index: usize) -> Result<Option<DecodedFrame>> {
            if index != self.next_index {
                self.capture
                    .set(videoio::CAP_PROP_POS_FRAMES, index as f64)?;
            }

            let mut bgr = Mat::default();
            if !self.capture.read(&mut bgr)? || bgr.empty() {
                return Ok(None);
            }
            self.next_index = index + 1;

            let mut rgba = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

            Ok(Some(DecodedFrame {
                index,
                size: [rgba.cols() as usize, rgba.rows() as usize],
                pixels: rgba.data_bytes()?.to_vec(),
            }))
        }
    }
}

#[cfg(not(feature = "video-opencv"))]
mod decoder {
    use super::{DecodedFrame, VideoInfo};
    use anyhow::{bail, Result};
    use std::path::Path;

    /// Placeholder when built without a video backend. Cannot be constructed.
    pub enum VideoDecoder {}

    impl VideoDecoder {
        pub fn open(path: &Path) -> Result<Self> {
            bail!(
                "cannot decode {}: built without the video-opencv feature",
                path.display()
            )
        }

        pub fn info(&self) -> &VideoInfo {
            match *self {}
        }

        pub fn frame(&mut self, _index: usize) -> Result<Option<DecodedFrame>> {
            match *self {}
        }
    }
}

pub use decoder::VideoDecoder;
