// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: tracking results and the playback clock.

pub mod playback;
pub mod track;
