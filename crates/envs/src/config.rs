//! Environment construction parameters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Selects what an observation carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationMode {
    /// Flat numeric feature vector.
    State,
    /// Rendered frame plus the reduced state vector.
    Pixels,
    /// Rendered frame plus the full state vector.
    PixelsDebug,
}

/// Construction-time configuration shared by every task environment.
///
/// Defaults reproduce the standard tabletop session: a 256px camera,
/// 0.2 action scale with 10 solver repeats per step, 120 Hz timestep and
/// 150 solver iterations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvConfig {
    pub image_dim: u32,
    /// Advisory; backends may ignore it. Kept for parameter compatibility
    /// with recorded demonstration batches.
    pub gui: bool,
    pub action_scale: f32,
    pub action_repeat: u32,
    pub timestep: f32,
    pub solver_iterations: u32,
    /// Initial end-effector position after reset.
    pub pos_init: [f32; 3],
    /// Workspace lower bound; targets are clipped here.
    pub pos_low: [f32; 3],
    /// Workspace upper bound; targets are clipped here.
    pub pos_high: [f32; 3],
    /// Maximum end-effector travel per solver step.
    pub max_step_travel: f32,
    pub observation_mode: ObservationMode,
    /// Idle steps after scene load so dropped objects settle.
    pub settle_steps: u32,
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            image_dim: 256,
            gui: false,
            action_scale: 0.2,
            action_repeat: 10,
            timestep: 1.0 / 120.0,
            solver_iterations: 150,
            pos_init: [0.5, 0.0, 0.0],
            pos_low: [0.4, -0.6, -0.36],
            pos_high: [1.0, 0.4, 0.25],
            max_step_travel: 0.05,
            observation_mode: ObservationMode::State,
            settle_steps: 10,
            seed: None,
        }
    }
}

impl EnvConfig {
    #[must_use]
    pub fn pos_low(&self) -> Vec3 {
        Vec3::from_array(self.pos_low)
    }

    #[must_use]
    pub fn pos_high(&self) -> Vec3 {
        Vec3::from_array(self.pos_high)
    }

    #[must_use]
    pub fn pos_init(&self) -> Vec3 {
        Vec3::from_array(self.pos_init)
    }

    /// The comparable parameter set stamped into recorded batches.
    #[must_use]
    pub fn params(&self) -> serde_json::Value {
        serde_json::json!({
            "action_scale": self.action_scale,
            "action_repeat": self.action_repeat,
            "timestep": self.timestep,
            "solver_iterations": self.solver_iterations,
            "pos_low": self.pos_low,
            "pos_high": self.pos_high,
            "observation_mode": self.observation_mode,
        })
    }

    /// Compare this configuration against a recorded parameter set.
    ///
    /// Returns every mismatching key; an empty list means the environment
    /// can replay data recorded under `other`.
    #[must_use]
    pub fn check_params(&self, other: &serde_json::Value) -> Vec<String> {
        let own = self.params();
        let (Some(own_map), Some(other_map)) = (own.as_object(), other.as_object()) else {
            return vec!["<params not an object>".to_owned()];
        };
        let mut mismatched: Vec<String> = own_map
            .iter()
            .filter(|(key, value)| other_map.get(*key) != Some(value))
            .map(|(key, _)| key.clone())
            .collect();
        for key in other_map.keys() {
            if !own_map.contains_key(key) {
                mismatched.push(key.clone());
            }
        }
        mismatched.sort();
        mismatched
    }
}
