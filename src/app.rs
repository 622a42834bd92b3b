// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns the playback clock, the overlay surface
//! and scheduler, and translates UI events (file opened, tracks loaded,
//! window resized, overlay toggled) into synchronizer and scheduler calls.

use crate::config::PreviewConfig;
use crate::io::media::VideoDecoder;
use crate::models::playback::Playback;
use crate::models::track::{TrackDataset, TrackSummary};
use crate::overlay::{
    sync, DisplayBox, DrawingSurface, OverlayScheduler, SyncTrigger, VideoSource,
};
use crate::ui::canvas::{OverlayCanvas, RepaintRequester};
use crate::ui::{canvas, properties, timeline, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Files and labels to open on startup.
#[derive(Debug, Default)]
pub struct Startup {
    pub video: Option<PathBuf>,
    pub tracks: Option<PathBuf>,
    pub job: Option<String>,
}

/// Main application state.
pub struct PreviewApp {
    config: PreviewConfig,

    /// Label shown for the current job
    job_label: Option<String>,

    /// Playback clock of the opened video
    playback: Option<Playback>,

    /// Frame decoder, when the build and the file support it
    decoder: Option<VideoDecoder>,

    /// Texture of the decoded frame under the playhead
    frame_texture: Option<egui::TextureHandle>,

    /// Source frame index held in `frame_texture`
    texture_frame: Option<usize>,

    /// Retained overlay surface
    canvas: OverlayCanvas,

    /// Paint loop driving `canvas`
    scheduler: OverlayScheduler,

    /// Counts for the loaded dataset, computed on load
    track_summary: Option<TrackSummary>,

    /// Per-display-frame callbacks for the scheduler
    frames: RepaintRequester,

    /// Whether the overlay view is shown (mounted)
    show_overlay: bool,

    /// Rect the video occupied last frame, for resize detection
    video_rect: Option<egui::Rect>,

    /// Receiver for background track loading
    tracks_loader: Option<Receiver<Result<TrackDataset, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

impl PreviewApp {
    /// Create a new preview application instance.
    pub fn new(ctx: &egui::Context, config: PreviewConfig, startup: Startup) -> Self {
        let mut app = Self {
            scheduler: OverlayScheduler::new(config.overlay.clone()),
            track_summary: None,
            config,
            job_label: startup.job,
            playback: None,
            decoder: None,
            frame_texture: None,
            texture_frame: None,
            canvas: OverlayCanvas::default(),
            frames: RepaintRequester::new(ctx.clone()),
            show_overlay: true,
            video_rect: None,
            tracks_loader: None,
            loading_message: None,
        };

        if let Some(path) = startup.video {
            app.open_video(path);
        }
        if let Some(path) = startup.tracks {
            app.load_tracks(path);
        }
        app
    }

    /// Open a video file as the new media source.
    pub fn open_video(&mut self, path: PathBuf) {
        log::info!("Opening video {}", path.display());

        let mut playback = Playback::new(path.clone());
        playback.set_looping(self.config.loop_playback);

        self.decoder = match VideoDecoder::open(&path) {
            Ok(decoder) => {
                let info = *decoder.info();
                playback.load_metadata(info.size, info.duration());
                Some(decoder)
            }
            Err(e) => {
                log::warn!("{:#}; using track metadata for the video size", e);
                None
            }
        };

        // Fall back to the size the tracking backend reported.
        if !playback.has_metadata() {
            if let Some(size) = self
                .scheduler
                .dataset()
                .and_then(|d| d.video.intrinsic_size())
            {
                playback.load_metadata(size, None);
            }
        }

        if self.config.autoplay {
            playback.play();
        }
        if self.job_label.is_none() {
            self.job_label = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned());
        }

        self.playback = Some(playback);
        self.frame_texture = None;
        self.texture_frame = None;
        self.video_rect = None;

        sync(
            self.playback.as_ref(),
            Some(&mut self.canvas),
            SyncTrigger::MetadataLoaded,
        );
        if self.decoder.is_none() {
            // No decoded frames will arrive; the metadata is all we get.
            sync(
                self.playback.as_ref(),
                Some(&mut self.canvas),
                SyncTrigger::DataLoaded,
            );
        }

        self.scheduler.source_changed(&mut self.frames);
        self.refresh_mount();
    }

    /// Load a tracks file in the background.
    pub fn load_tracks(&mut self, path: PathBuf) {
        let (sender, receiver) = channel();
        self.tracks_loader = Some(receiver);
        self.loading_message = Some(format!("Loading tracks from {}...", path.display()));

        std::thread::spawn(move || {
            let result = crate::io::serialization::import_tracks(&path)
                .map_err(|e| format!("Failed to load tracks: {:#}", e));
            let _ = sender.send(result);
        });
    }

    /// Hand a freshly loaded dataset to the overlay.
    fn apply_dataset(&mut self, dataset: TrackDataset) {
        if let Some(playback) = self.playback.as_mut() {
            if !playback.has_metadata() {
                if let Some(size) = dataset.video.intrinsic_size() {
                    let duration = dataset.video.frame_count.map(|n| n as f64 / dataset.fps());
                    if playback.load_metadata(size, duration) {
                        sync(
                            Some(&*playback),
                            Some(&mut self.canvas),
                            SyncTrigger::MetadataLoaded,
                        );
                    }
                }
            }
        }
        self.track_summary = Some(dataset.summary());
        self.scheduler
            .set_dataset(Some(Arc::new(dataset)), &mut self.frames);
    }

    /// Drop the current dataset; the overlay goes blank and idle.
    fn clear_tracks(&mut self) {
        self.scheduler.set_dataset(None, &mut self.frames);
        self.track_summary = None;
        self.canvas.clear();
    }

    /// Keep the scheduler's mount state in line with what is on screen.
    fn refresh_mount(&mut self) {
        let visible = self.show_overlay && self.playback.is_some();
        if visible {
            self.scheduler.mount(&mut self.frames);
        } else if self.scheduler.is_mounted() {
            self.scheduler.unmount(&mut self.frames);
            self.canvas.clear();
        }
    }

    /// Frame rate used for stepping and the timeline readout.
    fn step_fps(&self) -> f64 {
        match (&self.decoder, self.scheduler.dataset()) {
            (Some(decoder), _) => decoder.info().fps,
            (None, Some(dataset)) => dataset.fps(),
            (None, None) => crate::models::track::DEFAULT_FPS,
        }
    }

    /// Timeline length: the video's duration, else the tracked span.
    fn timeline_duration(&self) -> f64 {
        self.playback
            .as_ref()
            .and_then(|p| p.duration())
            .or_else(|| self.scheduler.dataset().map(|d| d.duration()))
            .unwrap_or(0.0)
    }

    /// Decode the frame under the playhead if it changed.
    fn update_frame_texture(&mut self, ctx: &egui::Context) {
        let (Some(decoder), Some(playback)) = (self.decoder.as_mut(), self.playback.as_ref())
        else {
            return;
        };
        let index = decoder.info().frame_at(playback.current_time());
        if self.texture_frame == Some(index) {
            return;
        }

        match decoder.frame(index) {
            Ok(Some(frame)) => {
                let first = self.frame_texture.is_none();
                let image = frame.to_color_image();
                match self.frame_texture.as_mut() {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.frame_texture =
                            Some(ctx.load_texture("video_frame", image, egui::TextureOptions::LINEAR));
                    }
                }
                self.texture_frame = Some(frame.index);

                if first {
                    sync(
                        self.playback.as_ref(),
                        Some(&mut self.canvas),
                        SyncTrigger::DataLoaded,
                    );
                }
            }
            Ok(None) => {
                self.texture_frame = Some(index);
            }
            Err(e) => {
                log::error!("Failed to decode frame {}: {:#}", index, e);
                self.texture_frame = Some(index);
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let fps = self.step_fps();
        let Some(playback) = self.playback.as_mut() else {
            return;
        };

        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            playback.toggle();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            playback.pause();
            playback.seek(playback.current_time() + 1.0 / fps);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            playback.pause();
            playback.seek(playback.current_time() - 1.0 / fps);
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed track loading
        if let Some(ref receiver) = self.tracks_loader {
            if let Ok(result) = receiver.try_recv() {
                self.tracks_loader = None;
                self.loading_message = None;

                match result {
                    Ok(dataset) => self.apply_dataset(dataset),
                    Err(e) => log::error!("{}", e),
                }
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Advance the clock
        let dt = ctx.input(|i| i.unstable_dt) as f64;
        if let Some(playback) = self.playback.as_mut() {
            playback.advance(dt);
            if playback.is_playing() {
                ctx.request_repaint();
            }
        }

        self.handle_keys(ctx);
        self.update_frame_texture(ctx);

        // Run the overlay tick for this display frame
        if let Some(handle) = self.frames.take_due() {
            if let Some(playback) = self.playback.as_ref() {
                self.scheduler
                    .on_frame(handle, playback, &mut self.canvas, &mut self.frames);
            }
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Video...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Video", &["mp4", "mov", "mkv", "avi"])
                            .pick_file()
                        {
                            self.open_video(path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Load Tracks...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Tracks", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.load_tracks(path);
                        }
                        ui.close_menu();
                    }
                    let has_tracks = self.scheduler.dataset().is_some();
                    if ui
                        .add_enabled(has_tracks, egui::Button::new("Clear Tracks"))
                        .clicked()
                    {
                        self.clear_tracks();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let mut show_overlay = self.show_overlay;
        let mut looping = self.config.loop_playback;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut show_overlay, &mut looping);
        });
        if looping != self.config.loop_playback {
            self.config.loop_playback = looping;
            if let Some(playback) = self.playback.as_mut() {
                playback.set_looping(looping);
            }
        }
        if show_overlay != self.show_overlay {
            self.show_overlay = show_overlay;
            log::info!("Overlay {}", if show_overlay { "shown" } else { "hidden" });
        }
        self.refresh_mount();

        // Info panel (right side)
        egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| {
                let source = properties::JobSource {
                    job: self.job_label.as_deref(),
                    video: self.playback.as_ref().map(|p| p.source()),
                };
                properties::show(
                    ui,
                    source,
                    self.scheduler.last_info(),
                    self.scheduler.state(),
                    self.scheduler.dataset().map(|d| d.as_ref()),
                    self.track_summary,
                    self.scheduler.style(),
                );
            });

        // Timeline and status (bottom)
        let duration = self.timeline_duration();
        let fps = self.step_fps();
        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .show(ctx, |ui| {
                let action = match self.playback.as_ref() {
                    Some(playback) => timeline::show(ui, playback, duration, fps),
                    None => timeline::TimelineAction::None,
                };
                if let Some(ref message) = self.loading_message {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(message.as_str());
                    });
                }
                action
            })
            .inner;

        if let Some(playback) = self.playback.as_mut() {
            match timeline_action {
                timeline::TimelineAction::TogglePlay => playback.toggle(),
                timeline::TimelineAction::Seek(time) => playback.seek(time),
                timeline::TimelineAction::None => {}
            }
        }

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            let video_rect = canvas::show(
                ui,
                self.playback.as_ref().and_then(|p| p.intrinsic_size()),
                self.frame_texture.as_ref(),
                self.playback.is_some(),
            );

            // A changed layout is a resize event for the synchronizer
            if video_rect != self.video_rect {
                self.video_rect = video_rect;
                if let (Some(rect), Some(playback)) = (video_rect, self.playback.as_mut()) {
                    // Height follows the intrinsic aspect ratio.
                    playback.set_display_box(DisplayBox::auto_height(rect.width()));
                    sync(
                        Some(&*playback),
                        Some(&mut self.canvas),
                        SyncTrigger::Resize,
                    );
                    log::trace!(
                        "Overlay surface {:?} shown at {:?}",
                        self.canvas.buffer_size(),
                        self.canvas.display_box()
                    );
                }
            }

            if let (Some(rect), true) = (video_rect, self.show_overlay) {
                self.canvas.paint(&ui.painter_at(rect), rect.min);
            }
        });
    }
}
