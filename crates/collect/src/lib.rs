#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! # Trajectory collection
//!
//! Records, batch persistence, and video export for the collection
//! drivers: trajectories accumulate in memory and flush to disk every N
//! episodes, image observations go to a separate flat dataset file, and
//! selected episodes export as animated GIFs.

pub mod dataset;
pub mod trajectory;
pub mod video;
pub mod writer;

pub use dataset::ImageDataset;
pub use trajectory::Trajectory;
pub use video::VideoWriter;
pub use writer::{read_batch, BatchWriter, TrajectoryBatch};

/// Persistence faults.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("batch encode failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("batch decode failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("frame length mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}
