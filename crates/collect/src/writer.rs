//! Periodic batch persistence.
//!
//! Finished trajectories accumulate in memory and flush to disk as one
//! encoded batch file per configured interval. There is no resumability:
//! a crash loses the unflushed batch.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::trajectory::Trajectory;
use crate::CollectError;

/// One persisted batch: the environment parameter set it was recorded
/// under (as JSON, for `EnvConfig::check_params`) plus the trajectories.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrajectoryBatch {
    pub params_json: String,
    pub trajectories: Vec<Trajectory>,
}

/// Accumulates trajectories and flushes every `flush_interval` episodes.
pub struct BatchWriter {
    dir: PathBuf,
    name: String,
    flush_interval: usize,
    params_json: String,
    pending: Vec<Trajectory>,
    batches_written: usize,
}

impl BatchWriter {
    /// Create a writer rooted at `dir`. The directory is created if
    /// missing; `params` is stamped into every batch.
    pub fn new(
        dir: &Path,
        name: &str,
        flush_interval: usize,
        params: &serde_json::Value,
    ) -> Result<Self, CollectError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            name: name.to_owned(),
            flush_interval: flush_interval.max(1),
            params_json: params.to_string(),
            pending: Vec::new(),
            batches_written: 0,
        })
    }

    /// Append a finished trajectory; flushes when the interval fills.
    pub fn push(&mut self, trajectory: Trajectory) -> Result<(), CollectError> {
        self.pending.push(trajectory);
        if self.pending.len() >= self.flush_interval {
            self.flush()?;
        }
        Ok(())
    }

    /// Write the pending batch to disk, if any.
    pub fn flush(&mut self) -> Result<(), CollectError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let path = self.batch_path(self.batches_written);
        let batch = TrajectoryBatch {
            params_json: self.params_json.clone(),
            trajectories: std::mem::take(&mut self.pending),
        };
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        bincode::serde::encode_into_std_write(&batch, &mut writer, bincode::config::standard())?;
        self.batches_written += 1;
        tracing::info!(
            path = %path.display(),
            trajectories = batch.trajectories.len(),
            "flushed trajectory batch"
        );
        Ok(())
    }

    /// Flush the tail batch. Call once after the episode loop.
    pub fn finish(mut self) -> Result<usize, CollectError> {
        self.flush()?;
        Ok(self.batches_written)
    }

    #[must_use]
    pub fn batches_written(&self) -> usize {
        self.batches_written
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn batch_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_batch{index}.bin", self.name))
    }
}

/// Read a batch file back.
pub fn read_batch(path: &Path) -> Result<TrajectoryBatch, CollectError> {
    let file = File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let batch =
        bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
    Ok(batch)
}
