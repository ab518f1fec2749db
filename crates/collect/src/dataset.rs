//! Flat image dataset written alongside the trajectory batches.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CollectError;

/// Fixed-shape `u8` frame store: `(trajectories, timesteps, frame_len)`
/// where `frame_len = height * width * channels`. Frames land in one
/// contiguous buffer and the whole dataset is written as a single file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageDataset {
    trajectories: usize,
    timesteps: usize,
    frame_len: usize,
    data: Vec<u8>,
}

impl ImageDataset {
    #[must_use]
    pub fn new(trajectories: usize, timesteps: usize, frame_len: usize) -> Self {
        Self {
            trajectories,
            timesteps,
            frame_len,
            data: vec![0; trajectories * timesteps * frame_len],
        }
    }

    /// Declared shape `(trajectories, timesteps, frame_len)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.trajectories, self.timesteps, self.frame_len)
    }

    /// Store one frame. The frame length must match the declared shape.
    pub fn set_frame(
        &mut self,
        trajectory: usize,
        timestep: usize,
        frame: &[u8],
    ) -> Result<(), CollectError> {
        if frame.len() != self.frame_len {
            return Err(CollectError::ShapeMismatch {
                expected: self.frame_len,
                got: frame.len(),
            });
        }
        let start = (trajectory * self.timesteps + timestep) * self.frame_len;
        self.data[start..start + self.frame_len].copy_from_slice(frame);
        Ok(())
    }

    /// Borrow one stored frame.
    #[must_use]
    pub fn frame(&self, trajectory: usize, timestep: usize) -> &[u8] {
        let start = (trajectory * self.timesteps + timestep) * self.frame_len;
        &self.data[start..start + self.frame_len]
    }

    pub fn save(&self, path: &Path) -> Result<(), CollectError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        tracing::info!(path = %path.display(), "wrote image dataset");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, CollectError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let dataset =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(dataset)
    }
}
