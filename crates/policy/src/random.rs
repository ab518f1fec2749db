//! Seeded uniform-random policy.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use envs::Observation;

use crate::Policy;

/// Uniform samples in `[-1, 1]^n`. Useful for smoke-testing an
/// environment's action handling and for baseline data.
pub struct RandomPolicy {
    action_dim: usize,
    rng: SmallRng,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(action_dim: usize, seed: u64) -> Self {
        Self {
            action_dim,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn reset(&mut self, _obs: &Observation) {}

    fn act(&mut self, _obs: &Observation, _t: usize) -> Vec<f32> {
        (0..self.action_dim)
            .map(|_| self.rng.random_range(-1.0..=1.0))
            .collect()
    }
}
