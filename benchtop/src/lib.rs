#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
//! # benchtop
//!
//! Command-line drivers for the tabletop manipulation environments:
//! scripted demonstration collection, interactive teleoperation, and
//! scene debugging. Every binary runs a synchronous foreground loop over
//! one simulator session; simulator faults terminate the loop.

use envs::{EnvConfig, ObservationMode};
use sim::RapierSim;

/// Initialize the fmt tracing subscriber. Call once per binary.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}

/// Fresh engine session for a driver.
#[must_use]
pub fn new_sim() -> Box<RapierSim> {
    Box::new(RapierSim::new())
}

/// Environment configuration shared by the collection drivers.
#[must_use]
pub fn collection_config(
    observation_mode: ObservationMode,
    image_dim: u32,
    seed: Option<u64>,
) -> EnvConfig {
    EnvConfig {
        observation_mode,
        image_dim,
        seed,
        ..EnvConfig::default()
    }
}

/// Flatten a rendered RGBA frame to packed RGB bytes for image datasets.
#[must_use]
pub fn frame_to_rgb(frame: &image::RgbaImage) -> Vec<u8> {
    let mut out = Vec::with_capacity((frame.width() * frame.height() * 3) as usize);
    for pixel in frame.pixels() {
        out.extend_from_slice(&pixel.0[..3]);
    }
    out
}
