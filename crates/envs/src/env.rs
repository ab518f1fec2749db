//! The environment contract shared by every task.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;
use crate::observation::Observation;
use crate::EnvError;

/// Auxiliary per-step information.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// 1.0 when the episode ended with a successful grasp, 0.0 when it
    /// ended without one; `None` for tasks that do not track grasping.
    pub grasp_success: Option<f32>,
}

/// Result of one environment step.
#[derive(Clone, Debug)]
pub struct Step {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

/// Gym-style environment interface.
///
/// `step` advances the live simulator session by one decoded action and
/// returns the fresh observation, the task reward, and the termination
/// flag. Simulator faults propagate un-recovered; a failed call ends the
/// episode.
pub trait Env {
    /// Rebuild the scene and return the initial observation.
    fn reset(&mut self) -> Result<Observation, EnvError>;

    /// Advance by one action. The action length must match
    /// [`action_size`](Env::action_size).
    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError>;

    /// Render a frame of the current scene.
    fn render(&mut self, width: u32, height: u32) -> RgbaImage;

    /// Length of the state vector produced after `reset`.
    fn observation_size(&self) -> usize;

    /// Expected action vector length. Actions live in `[-1, 1]^n`.
    fn action_size(&self) -> usize;

    fn config(&self) -> &EnvConfig;
}
