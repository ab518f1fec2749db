//! Trajectory records assembled by the collection drivers.

use envs::{Observation, Step};
use serde::{Deserialize, Serialize};

/// One reset-to-done interaction sequence, stored as parallel arrays
/// with fixed keys so downstream loaders can rely on the shapes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub observations: Vec<Vec<f32>>,
    pub next_observations: Vec<Vec<f32>>,
    pub actions: Vec<Vec<f32>>,
    pub rewards: Vec<f32>,
    /// 1 where the episode terminated at that step.
    pub terminals: Vec<u8>,
    /// Grasp-success flags; 0.0 for tasks that do not track grasping.
    pub env_infos: Vec<f32>,
    /// Free-form label, e.g. the target object name.
    pub label: String,
}

impl Trajectory {
    #[must_use]
    pub fn with_label(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            ..Self::default()
        }
    }

    /// Append one transition.
    pub fn push(&mut self, observation: &Observation, action: &[f32], step: &Step) {
        self.observations.push(observation.state.clone());
        self.next_observations.push(step.observation.state.clone());
        self.actions.push(action.to_vec());
        self.rewards.push(step.reward);
        self.terminals.push(u8::from(step.done));
        self.env_infos
            .push(step.info.grasp_success.unwrap_or(0.0));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Total undiscounted return.
    #[must_use]
    pub fn episode_return(&self) -> f32 {
        self.rewards.iter().sum()
    }
}
