// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HeadHuntr preview
//!
//! A cross-platform desktop application for previewing head tracking
//! results: bounding boxes and persistent IDs drawn over the video in sync
//! with playback.

mod app;
mod config;
mod io;
mod models;
mod overlay;
mod ui;
mod util;

use anyhow::Result;
use app::{PreviewApp, Startup};
use clap::Parser;
use config::PreviewConfig;
use std::path::PathBuf;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Preview head tracking overlays on a video")]
struct Args {
    /// Video file to open
    #[arg(long)]
    video: Option<PathBuf>,

    /// Tracks file (JSON or YAML) produced by the tracking backend
    #[arg(long)]
    tracks: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label shown for the job in the info panel
    #[arg(long)]
    job: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PreviewConfig::load(path)?,
        None => PreviewConfig::default(),
    };
    log::debug!("Using config {:?}", config);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0])
            .with_title("HeadHuntr - Tracking Overlay Preview"),
        ..Default::default()
    };

    let startup = Startup {
        video: args.video,
        tracks: args.tracks,
        job: args.job,
    };

    // Run the application
    eframe::run_native(
        "HeadHuntr Preview",
        options,
        Box::new(move |cc| Ok(Box::new(PreviewApp::new(&cc.egui_ctx, config, startup)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
